//! Flat content store keyed by fingerprint.
//!
//! Every novel payload is written once as `<fingerprint>.<extension>` in a
//! single directory; the fingerprint is always recoverable by cutting the
//! name at the first `.`. Payloads that share a fingerprint with a stored
//! item but differ in content are kept apart under `collisions/`.
//!
//! # Modules
//!
//! - [`extension`] - best-effort file type detection, falling back to `unknown`
//! - [`fix`] - rename stored items whose extension no longer matches detection

pub mod extension;
pub mod fix;

mod error;
mod fs;
mod store;

pub use error::{Error, ResolveError, Result};
pub use extension::{ExtensionResolver, SignatureResolver, UNKNOWN, Unavailable, extension_for};
pub use fix::{FixOptions, FixReport, Rename, fix_extensions};
pub use fs::{AtomicWriteOptions, atomic_write};
pub use store::{COLLISIONS_DIR, ContentStore, StoredItem};
