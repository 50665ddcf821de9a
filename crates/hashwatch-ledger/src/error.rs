use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to list {path}: {source}")]
    ReadDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read entry in {path}: {source}")]
    ReadEntry {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
