use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hashwatch_fingerprint::Fingerprint;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::fs::{AtomicWriteOptions, atomic_write};

/// Subdirectory holding payloads that collided with a different stored item.
pub const COLLISIONS_DIR: &str = "collisions";

/// Hex characters of the SHA-256 digest kept in quarantined file names.
const DIGEST_PREFIX_LEN: usize = 16;

/// A file in the store whose name carries the fingerprint tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredItem {
    pub fingerprint: Fingerprint,
    /// Everything after the first `.`; `None` for a bare fingerprint.
    pub extension:   Option<String>,
    pub path:        PathBuf,
}

impl StoredItem {
    fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let fingerprint = Fingerprint::from_file_name(name)?;
        let extension = name.split_once('.').map(|(_, ext)| ext.to_owned());
        Some(Self {
            fingerprint,
            extension,
            path,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    root:    PathBuf,
    options: AtomicWriteOptions,
}

impl ContentStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| Error::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self {
            root,
            options: AtomicWriteOptions::new(),
        })
    }

    pub fn with_options(mut self, options: AtomicWriteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn path_for(&self, fingerprint: &Fingerprint, extension: &str) -> PathBuf {
        self.root.join(fingerprint.file_name(extension))
    }

    /// Store a novel payload. Stored items are immutable: an existing file
    /// with the same name is left untouched and reported as [`Error::Exists`].
    pub fn put(&self, fingerprint: &Fingerprint, extension: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(fingerprint, extension);
        if path.exists() {
            return Err(Error::Exists(path));
        }
        atomic_write(&path, content, self.options)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "stored new item");
        Ok(path)
    }

    /// Locate the stored item for `fingerprint`, whatever its extension.
    pub fn find(&self, fingerprint: &Fingerprint) -> Result<Option<StoredItem>> {
        Ok(self
            .items()?
            .into_iter()
            .find(|item| &item.fingerprint == fingerprint))
    }

    /// Like [`find`](Self::find), but checks `<fingerprint>.<extension>`
    /// first so the common case does not list the directory.
    pub fn lookup(&self, fingerprint: &Fingerprint, extension: &str) -> Result<Option<StoredItem>> {
        let path = self.path_for(fingerprint, extension);
        if path.is_file() {
            return Ok(Some(StoredItem {
                fingerprint: fingerprint.clone(),
                extension: Some(extension.to_owned()),
                path,
            }));
        }
        self.find(fingerprint)
    }

    pub fn read(&self, item: &StoredItem) -> Result<Vec<u8>> {
        fs::read(&item.path).map_err(|source| Error::Read {
            path: item.path.clone(),
            source,
        })
    }

    /// Every tagged regular file in the store, sorted by name.
    pub fn items(&self) -> Result<Vec<StoredItem>> {
        let entries = fs::read_dir(&self.root).map_err(|source| Error::ReadDir {
            path: self.root.clone(),
            source,
        })?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::ReadDir {
                path: self.root.clone(),
                source,
            })?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            if let Some(item) = StoredItem::from_path(entry.path()) {
                items.push(item);
            }
        }
        items.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(items)
    }

    /// Keep a payload that shares `fingerprint` with a different stored
    /// item. The name adds a SHA-256 prefix so several distinct payloads
    /// for one fingerprint can coexist.
    pub fn quarantine(&self, fingerprint: &Fingerprint, extension: &str, content: &[u8]) -> Result<PathBuf> {
        let dir = self.root.join(COLLISIONS_DIR);
        fs::create_dir_all(&dir).map_err(|source| Error::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let digest = hex::encode(Sha256::digest(content));
        let path = dir.join(format!(
            "{fingerprint}-{}.{extension}",
            &digest[..DIGEST_PREFIX_LEN]
        ));
        match fs::metadata(&path) {
            Ok(_) => {
                tracing::debug!(path = %path.display(), "colliding payload already kept");
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(Error::Read { path, source }),
        }

        atomic_write(&path, content, self.options)?;
        tracing::warn!(path = %path.display(), "kept payload for distinct-content collision");
        Ok(path)
    }
}
