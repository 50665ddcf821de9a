use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicWriteOptions {
    pub sync: bool,
}

impl AtomicWriteOptions {
    pub fn new() -> Self { Self::default() }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Write `content` next to `path` under a dot-prefixed name, then rename
/// into place. The temporary name never carries the fingerprint tag, so an
/// interrupted write is invisible to ledger seeding.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: AtomicWriteOptions) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or(Path::new(""));
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let tmp_path = parent.join(format!(".{file_name}.tmp"));

    fs::write(&tmp_path, content).map_err(|source| Error::Write {
        path: tmp_path.clone(),
        source,
    })?;

    if options.sync {
        fs::File::open(&tmp_path)
            .and_then(|file| file.sync_all())
            .map_err(|source| Error::Write {
                path: tmp_path.clone(),
                source,
            })?;
    }

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        Error::Rename {
            from: tmp_path.clone(),
            to: path.to_path_buf(),
            source,
        }
    })
}
