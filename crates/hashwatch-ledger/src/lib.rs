//! In-memory record of every fingerprint seen during a run, plus the
//! success / collision / failure counters used to report on it.
//!
//! The ledger is owned by one poll loop and mutated through `&mut self`;
//! exactly one of [`Ledger::record_success`], [`Ledger::record_collision`] or
//! [`Ledger::record_failure`] is called per cycle.

pub use self::error::{Error, Result};
pub use self::ledger::Ledger;
pub use self::summary::{RECENT_WINDOW, Summary};

mod error;
mod ledger;
mod summary;
