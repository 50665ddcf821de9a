use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, Result};
use crate::hasher::{ContentHasher, Xxh3Hasher};

/// Leading tag on every fingerprint.
pub const TAG: &str = "rs";

/// Hex digits needed to print `i64::MAX`.
pub const HEX_WIDTH: usize = (i64::BITS / 4) as usize;

/// `rs` + sign + `0x` + digits.
pub const FINGERPRINT_LEN: usize = TAG.len() + 1 + 2 + HEX_WIDTH;

/// Identifying token for a payload, also used as the stored file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Extract the fingerprint from a content store file name.
    ///
    /// Any name carrying the tag is accepted and the stem before the first
    /// `.` is kept, so stores written by other tools still seed the ledger.
    /// Names without the tag yield `None`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if !name.starts_with(TAG) {
            return None;
        }
        let stem = name.split('.').next().unwrap_or(name);
        Some(Self(stem.to_owned()))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// File name for this fingerprint with the given extension (no dot).
    pub fn file_name(&self, extension: &str) -> String { format!("{}.{}", self.0, extension) }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str { &self.0 }
}

impl FromStr for Fingerprint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != FINGERPRINT_LEN {
            return Err(ParseError::Length {
                expected: FINGERPRINT_LEN,
                actual:   s.len(),
            });
        }
        let Some(rest) = s.strip_prefix(TAG) else {
            return Err(ParseError::MissingTag(s.to_owned()));
        };
        let Some(rest) = rest.strip_prefix(['+', '-']) else {
            return Err(ParseError::Sign(s.to_owned()));
        };
        let Some(digits) = rest.strip_prefix("0x") else {
            return Err(ParseError::Marker(s.to_owned()));
        };
        if !digits.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(ParseError::Digits(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }
}

/// Render a signed hash as a fingerprint token.
pub fn render(hash: i64) -> Fingerprint {
    let sign = if hash < 0 { '-' } else { '+' };
    Fingerprint(format!(
        "{TAG}{sign}0x{:0width$x}",
        hash.unsigned_abs(),
        width = HEX_WIDTH
    ))
}

/// Fingerprint a payload with the seed-stable XXH3 hash.
pub fn fingerprint(content: &[u8]) -> Fingerprint { render(Xxh3Hasher::digest(content)) }
