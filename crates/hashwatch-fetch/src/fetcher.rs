use bytes::Bytes;

use crate::error::{FetchError, Result};
use crate::http::HttpClient;
use crate::options::FetchOptions;

/// Expected status for a usable response.
const STATUS_OK: u16 = 200;

/// Repeatedly GETs one fixed URL.
pub struct Fetcher<C: HttpClient> {
    client:  C,
    url:     String,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions { &self.options }

    pub fn client(&self) -> &C { &self.client }

    /// Fetch with the configured attempt bound.
    pub async fn fetch(&self) -> Option<Bytes> { self.fetch_attempts(self.options.max_attempts).await }

    /// Try up to `max_attempts` times and return the first 200 body.
    ///
    /// Failed attempts are logged and retried immediately. `None` means
    /// every attempt failed; it is the caller's job to count that.
    pub async fn fetch_attempts(&self, max_attempts: u32) -> Option<Bytes> {
        for attempt in 1..=max_attempts {
            match self.try_once().await {
                Ok(body) => return Some(body),
                Err(e) => {
                    tracing::warn!(
                        url = %self.url,
                        attempt,
                        max_attempts,
                        error = %e,
                        "fetch attempt failed"
                    );
                }
            }
        }
        tracing::warn!(url = %self.url, max_attempts, "maximum attempts reached, no content");
        None
    }

    /// One GET; any status other than 200 is an error.
    pub async fn try_once(&self) -> Result<Bytes> {
        let response = self.client.get(&self.url).await.map_err(Self::map_error)?;
        if response.status != STATUS_OK {
            return Err(FetchError::Status {
                status: response.status,
            });
        }
        Ok(response.body)
    }

    fn map_error<E: std::error::Error + Send + 'static>(e: E) -> FetchError { FetchError::Network(e.to_string()) }
}
