use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`Fetcher`](crate::Fetcher).
///
/// # Examples
///
/// ```
/// use hashwatch_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .max_attempts(3)
///     .timeout(Duration::from_secs(10));
/// assert_eq!(options.max_attempts, 3);
/// ```
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Attempts per fetch, including the first. Attempts run back to back
    /// with no backoff.
    ///
    /// Default: 1
    pub max_attempts: u32,

    /// Per-request timeout applied by the HTTP client.
    ///
    /// Default: 30s
    pub timeout: Duration,

    /// `User-Agent` header sent with every request.
    ///
    /// Default: `hashwatch/<version>`
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            timeout:      DEFAULT_TIMEOUT,
            user_agent:   concat!("hashwatch/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl FetchOptions {
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
