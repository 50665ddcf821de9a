//! The fetch → classify → persist poll loop.
//!
//! Every pass ends in exactly one ledger update:
//!
//! ```text
//! Fetching ─┬─ no content / empty ──────────────► Failed
//!           └─ body ─► Classifying ─┬─ known ───► Collision
//!                                   └─ novel ─┬─► Stored
//!                                             └─► Failed (write error)
//! ```
//!
//! Nothing inside a pass can abort the run; the only ways out are finishing
//! the requested passes or a shutdown signal.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use hashwatch_fetch::{Fetcher, HttpClient};
use hashwatch_fingerprint::{Fingerprint, fingerprint};
use hashwatch_ledger::Ledger;
use hashwatch_store::{ContentStore, ExtensionResolver, extension_for};
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Pause between passes; zero skips it.
    pub delay:             Duration,
    /// Read the stored item back on a collision to tell repeats from
    /// genuine hash collisions.
    pub verify_collisions: bool,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            delay:             Duration::from_secs(5),
            verify_collisions: true,
        }
    }
}

/// Result of a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Stored {
        fingerprint: Fingerprint,
        path:        PathBuf,
    },
    Collision {
        fingerprint: Fingerprint,
        /// Payload differs from the stored item.
        distinct:    bool,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub passes:      u64,
    pub interrupted: bool,
}

pub struct Monitor<C: HttpClient, R: ExtensionResolver> {
    fetcher:  Fetcher<C>,
    store:    ContentStore,
    resolver: R,
    options:  MonitorOptions,
}

impl<C: HttpClient, R: ExtensionResolver> Monitor<C, R> {
    pub fn new(fetcher: Fetcher<C>, store: ContentStore, resolver: R, options: MonitorOptions) -> Self {
        Self {
            fetcher,
            store,
            resolver,
            options,
        }
    }

    pub fn store(&self) -> &ContentStore { &self.store }

    /// Run up to `passes` cycles, pausing between them.
    ///
    /// A `true` on `shutdown` stops the run before the next pass or in the
    /// middle of a pause. A closed channel is ignored.
    pub async fn run(&self, ledger: &mut Ledger, passes: u64, shutdown: &mut watch::Receiver<bool>) -> RunReport {
        let mut report = RunReport {
            passes:      0,
            interrupted: false,
        };

        for pass in 1..=passes {
            if *shutdown.borrow() {
                break;
            }

            tracing::info!(pass, passes, status = %ledger, "starting pass");
            let outcome = self.cycle(ledger).await;
            tracing::debug!(pass, ?outcome, "pass finished");
            report.passes = pass;

            if pass == passes || self.options.delay.is_zero() {
                continue;
            }
            tokio::select! {
                () = tokio::time::sleep(self.options.delay) => {}
                Ok(()) = shutdown.changed() => {}
            }
        }

        if *shutdown.borrow() && report.passes < passes {
            report.interrupted = true;
            tracing::info!(completed = report.passes, passes, "run interrupted");
        }
        report
    }

    /// One fetch and its classification.
    pub async fn cycle(&self, ledger: &mut Ledger) -> Outcome {
        match self.fetcher.fetch().await {
            Some(content) if !content.is_empty() => self.classify(ledger, &content),
            Some(_) => Self::fail(ledger, "empty response body".to_owned()),
            None => Self::fail(
                ledger,
                format!("no content after {} attempt(s)", self.fetcher.options().max_attempts),
            ),
        }
    }

    /// Classify a payload already in hand and record the result.
    pub fn classify(&self, ledger: &mut Ledger, content: &[u8]) -> Outcome {
        let fp = fingerprint(content);
        let ext = extension_for(&self.resolver, content);

        if ledger.has(&fp) {
            let distinct = self.options.verify_collisions && self.is_distinct(&fp, &ext, content);
            if distinct {
                ledger.record_distinct_collision();
            } else {
                ledger.record_collision();
            }
            tracing::info!(fingerprint = %fp, distinct, "collision\n{}", ledger.summary());
            return Outcome::Collision {
                fingerprint: fp,
                distinct,
            };
        }

        match self.store.put(&fp, &ext, content) {
            Ok(path) => {
                ledger.record_success(fp.clone());
                Outcome::Stored {
                    fingerprint: fp,
                    path,
                }
            }
            Err(e) => Self::fail(ledger, e.to_string()),
        }
    }

    /// Whether `content` differs from what the store holds for `fp`. Any
    /// problem reading the stored item counts as "same".
    fn is_distinct(&self, fp: &Fingerprint, ext: &str, content: &[u8]) -> bool {
        let item = match self.store.lookup(fp, ext) {
            Ok(Some(item)) => item,
            Ok(None) => {
                tracing::debug!(fingerprint = %fp, "no stored item to compare against");
                return false;
            }
            Err(e) => {
                tracing::warn!(fingerprint = %fp, error = %e, "cannot scan store for comparison");
                return false;
            }
        };
        let stored = match self.store.read(&item) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(fingerprint = %fp, error = %e, "cannot read stored item for comparison");
                return false;
            }
        };
        if stored == content {
            return false;
        }
        if let Err(e) = self.store.quarantine(fp, ext, content) {
            tracing::warn!(fingerprint = %fp, error = %e, "failed to keep colliding payload");
        }
        true
    }

    fn fail(ledger: &mut Ledger, reason: String) -> Outcome {
        ledger.record_failure();
        tracing::warn!(%reason, "pass failed");
        Outcome::Failed { reason }
    }
}

/// Forward interrupts from `next` to `shutdown`.
///
/// The first interrupt asks the run to stop. Returns `true` when a second
/// one arrives, and `false` if the signal source fails.
pub async fn relay_interrupts<F, Fut>(mut next: F, shutdown: watch::Sender<bool>) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(e) = next().await {
        tracing::warn!(error = %e, "cannot listen for interrupts");
        return false;
    }
    tracing::info!("interrupt received, stopping after the current pass");
    let _ = shutdown.send(true);

    match next().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for interrupts");
            false
        }
    }
}
