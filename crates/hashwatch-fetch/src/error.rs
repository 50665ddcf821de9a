//! Error types for hashwatch-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },
}

pub type Result<T> = std::result::Result<T, FetchError>;
