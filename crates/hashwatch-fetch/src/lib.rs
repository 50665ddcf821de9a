//! Bounded-attempt HTTP fetching of one fixed endpoint.
//!
//! # Architecture
//!
//! - [`FetchOptions`] - immutable attempt / timeout configuration
//! - [`HttpClient`] - the I/O seam, implemented by [`ReqwestClient`] and by
//!   scripted clients in tests
//! - [`Fetcher`] - the retry loop; exhaustion is reported as `None`, not as
//!   an error, so the caller can count it and carry on

mod error;
mod fetcher;
mod http;
mod options;

pub use error::{FetchError, Result};
pub use fetcher::Fetcher;
pub use http::{HttpClient, Response};
pub use options::FetchOptions;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
