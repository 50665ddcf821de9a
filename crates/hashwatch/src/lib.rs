//! Passive monitor for endpoints that serve changing payloads.
//!
//! Each pass fetches the endpoint once, fingerprints the body and either
//! stores it (first sighting) or counts a collision (seen before). The
//! [`Ledger`](hashwatch_ledger::Ledger) carries the statistics and is owned
//! by the caller; [`Monitor`] borrows it mutably for the duration of a run.

pub mod config;
pub mod monitor;

pub use config::{Config, ConfigError, Overrides};
pub use monitor::{Monitor, MonitorOptions, Outcome, RunReport, relay_interrupts};
