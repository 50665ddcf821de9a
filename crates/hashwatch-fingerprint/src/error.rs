#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("fingerprint must be {expected} characters, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("fingerprint must start with the `rs` tag: {0}")]
    MissingTag(String),

    #[error("fingerprint sign must be `+` or `-`: {0}")]
    Sign(String),

    #[error("fingerprint must carry a `0x` marker: {0}")]
    Marker(String),

    #[error("fingerprint digits must be lowercase hex: {0}")]
    Digits(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;
