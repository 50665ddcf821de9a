use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list {path}: {source}")]
    ReadDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from:   PathBuf,
        to:     PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to overwrite {0}")]
    Exists(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a payload's type could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no content to inspect")]
    Empty,

    #[error("content does not match any known signature")]
    Unrecognized,

    #[error("type detection is not available")]
    Unavailable,
}
