//! Re-detect stored item types and repair stale extensions.
//!
//! Useful after switching to a better resolver or to clear a backlog of
//! `.unknown` files. An item is only renamed when the resolver positively
//! identifies its type; a failed detection never downgrades a name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::extension::ExtensionResolver;
use crate::store::{ContentStore, StoredItem};

#[derive(Debug, Clone, Copy, Default)]
pub struct FixOptions {
    /// Report what would change without touching the store.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to:   PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct FixReport {
    pub scanned:    usize,
    pub unchanged:  usize,
    pub undetected: usize,
    pub renamed:    Vec<Rename>,
    pub failed:     Vec<(PathBuf, String)>,
}

impl fmt::Display for FixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rename in &self.renamed {
            writeln!(f, "{} -> {}", rename.from.display(), rename.to.display())?;
        }
        for (path, reason) in &self.failed {
            writeln!(f, "failed {}: {reason}", path.display())?;
        }
        write!(
            f,
            "scanned {}, renamed {}, unchanged {}, undetected {}, failed {}",
            self.scanned,
            self.renamed.len(),
            self.unchanged,
            self.undetected,
            self.failed.len()
        )
    }
}

pub fn fix_extensions<R: ExtensionResolver + ?Sized>(
    store: &ContentStore,
    resolver: &R,
    options: FixOptions,
) -> Result<FixReport> {
    let mut report = FixReport::default();

    for item in store.items()? {
        report.scanned += 1;

        let content = match store.read(&item) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %item.path.display(), error = %e, "skipping unreadable item");
                report.failed.push((item.path, e.to_string()));
                continue;
            }
        };

        let detected = match resolver.resolve(&content) {
            Ok(ext) => ext,
            Err(e) => {
                tracing::debug!(path = %item.path.display(), error = %e, "type still undetected");
                report.undetected += 1;
                continue;
            }
        };

        if item.extension.as_deref() == Some(detected.as_str()) {
            report.unchanged += 1;
            continue;
        }

        let to = store.path_for(&item.fingerprint, &detected);
        match rename(&item, &to, options) {
            Ok(()) => report.renamed.push(Rename { from: item.path, to }),
            Err(e) => {
                tracing::warn!(path = %item.path.display(), error = %e, "rename failed");
                report.failed.push((item.path, e.to_string()));
            }
        }
    }

    tracing::info!(
        scanned = report.scanned,
        renamed = report.renamed.len(),
        dry_run = options.dry_run,
        "extension fix complete"
    );
    Ok(report)
}

fn rename(item: &StoredItem, to: &Path, options: FixOptions) -> Result<()> {
    if to.exists() {
        return Err(Error::Exists(to.to_path_buf()));
    }
    if options.dry_run {
        return Ok(());
    }
    fs::rename(&item.path, to).map_err(|source| Error::Rename {
        from: item.path.clone(),
        to: to.to_path_buf(),
        source,
    })?;
    tracing::info!(from = %item.path.display(), to = %to.display(), "renamed item");
    Ok(())
}
