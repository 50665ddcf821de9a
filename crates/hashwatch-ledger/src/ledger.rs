use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use hashwatch_fingerprint::Fingerprint;

use crate::error::{Error, Result};
use crate::summary::Summary;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    seen:                     HashSet<Fingerprint>,
    success_count:            u64,
    collision_count:          u64,
    distinct_collision_count: u64,
    failure_count:            u64,
    since_last_collision:     u64,
    time_to_collide:          Vec<u64>,
}

impl Ledger {
    pub fn new() -> Self { Self::default() }

    /// Build a ledger already seeded from a content store directory.
    pub fn seeded(dir: impl AsRef<Path>) -> Result<Self> {
        let mut ledger = Self::new();
        ledger.seed(dir)?;
        Ok(ledger)
    }

    /// Insert the fingerprint of every tagged entry in `dir`.
    ///
    /// Untagged names (notes, temp files, subdirectories such as
    /// `collisions`) are skipped. A directory that does not exist yet seeds
    /// nothing. Returns how many new fingerprints were added.
    pub fn seed(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %dir.display(), "content store missing, nothing to seed");
                return Ok(0);
            }
            Err(source) => {
                return Err(Error::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };

        let mut added = 0;
        for entry in entries {
            let entry = entry.map_err(|source| Error::ReadEntry {
                path: dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name();
            let Some(fp) = name.to_str().and_then(Fingerprint::from_file_name) else {
                continue;
            };
            if self.seen.insert(fp) {
                added += 1;
            }
        }

        tracing::info!(path = %dir.display(), added, "seeded ledger from content store");
        Ok(added)
    }

    pub fn has(&self, fingerprint: &Fingerprint) -> bool { self.seen.contains(fingerprint) }

    pub fn record_success(&mut self, fingerprint: Fingerprint) {
        self.seen.insert(fingerprint);
        self.success_count += 1;
        self.since_last_collision += 1;
    }

    pub fn record_collision(&mut self) {
        self.collision_count += 1;
        self.time_to_collide.push(self.since_last_collision);
        self.since_last_collision = 0;
    }

    /// A collision whose payload differs from the stored item.
    pub fn record_distinct_collision(&mut self) {
        self.record_collision();
        self.distinct_collision_count += 1;
    }

    pub fn record_failure(&mut self) { self.failure_count += 1; }

    pub fn len(&self) -> usize { self.seen.len() }

    pub fn is_empty(&self) -> bool { self.seen.is_empty() }

    pub fn success_count(&self) -> u64 { self.success_count }

    pub fn collision_count(&self) -> u64 { self.collision_count }

    pub fn distinct_collision_count(&self) -> u64 { self.distinct_collision_count }

    pub fn failure_count(&self) -> u64 { self.failure_count }

    pub fn since_last_collision(&self) -> u64 { self.since_last_collision }

    pub fn time_to_collide(&self) -> &[u64] { &self.time_to_collide }

    pub fn summary(&self) -> Summary {
        Summary::new(
            self.failure_count,
            self.success_count,
            self.collision_count,
            self.distinct_collision_count,
            &self.time_to_collide,
        )
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Ledger +{}/-{}/!{}/n{}/t{}>",
            self.success_count,
            self.collision_count,
            self.failure_count,
            self.seen.len(),
            self.since_last_collision
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashwatch_fingerprint::fingerprint;

    #[test]
    fn fresh_ledger_is_empty() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.success_count(), 0);
        assert_eq!(ledger.collision_count(), 0);
        assert_eq!(ledger.failure_count(), 0);
        assert!(ledger.time_to_collide().is_empty());
    }

    #[test]
    fn success_marks_seen() {
        let mut ledger = Ledger::new();
        let fp = fingerprint(b"hello");
        assert!(!ledger.has(&fp));

        ledger.record_success(fp.clone());

        assert!(ledger.has(&fp));
        assert_eq!(ledger.success_count(), 1);
        assert_eq!(ledger.since_last_collision(), 1);
    }

    #[test]
    fn three_successes_then_collision() {
        let mut ledger = Ledger::new();
        for payload in [b"a", b"b", b"c"] {
            ledger.record_success(fingerprint(payload));
        }
        ledger.record_collision();

        assert_eq!(ledger.time_to_collide(), &[3]);
        assert_eq!(ledger.since_last_collision(), 0);
        assert_eq!(ledger.collision_count(), 1);
    }

    #[test]
    fn gaps_between_collisions() {
        let mut ledger = Ledger::new();
        ledger.record_success(fingerprint(b"a"));
        ledger.record_collision();
        ledger.record_collision();
        ledger.record_success(fingerprint(b"b"));
        ledger.record_success(fingerprint(b"c"));
        ledger.record_collision();

        assert_eq!(ledger.time_to_collide(), &[1, 0, 2]);
        assert_eq!(ledger.collision_count(), 3);
    }

    #[test]
    fn failure_leaves_gap_untouched() {
        let mut ledger = Ledger::new();
        ledger.record_success(fingerprint(b"a"));
        ledger.record_failure();

        assert_eq!(ledger.failure_count(), 1);
        assert_eq!(ledger.since_last_collision(), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn distinct_collision_counts_as_collision() {
        let mut ledger = Ledger::new();
        ledger.record_success(fingerprint(b"a"));
        ledger.record_distinct_collision();

        assert_eq!(ledger.collision_count(), 1);
        assert_eq!(ledger.distinct_collision_count(), 1);
        assert_eq!(ledger.time_to_collide(), &[1]);
    }

    #[test]
    fn display_status_line() {
        let mut ledger = Ledger::new();
        ledger.record_success(fingerprint(b"a"));
        ledger.record_success(fingerprint(b"b"));
        ledger.record_collision();
        ledger.record_failure();

        assert_eq!(ledger.to_string(), "<Ledger +2/-1/!1/n2/t0>");
    }

    #[test]
    fn seed_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::new();
        assert_eq!(ledger.seed(dir.path().join("absent")).unwrap(), 0);
        assert!(ledger.is_empty());
    }
}
