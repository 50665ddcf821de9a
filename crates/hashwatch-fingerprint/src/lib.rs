//! Content fingerprints for the hashwatch content store.
//!
//! A fingerprint is a 64-bit non-cryptographic hash of a payload, read as a
//! signed integer and rendered as a filename-safe token of constant width:
//!
//! ```text
//! rs+0x00000000deadbeef
//! rs-0x7a3f0c11e2d45b90
//! ```
//!
//! The `rs` tag keeps tokens from starting with `-`, and the zero padding keeps
//! every token exactly [`FINGERPRINT_LEN`] characters long.
//!
//! # Example
//!
//! ```
//! use hashwatch_fingerprint::{fingerprint, FINGERPRINT_LEN, TAG};
//!
//! let fp = fingerprint(b"hello");
//! assert!(fp.as_str().starts_with(TAG));
//! assert_eq!(fp.as_str().len(), FINGERPRINT_LEN);
//! assert_eq!(fp, fingerprint(b"hello"));
//! ```

pub use self::error::{ParseError, Result};
pub use self::fingerprint::{FINGERPRINT_LEN, Fingerprint, HEX_WIDTH, TAG, fingerprint, render};
pub use self::hasher::{ContentHasher, SEED, Xxh3Hasher};

mod error;
mod fingerprint;
mod hasher;
