use std::future::Future;

use bytes::Bytes;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body:   Bytes,
}

impl Response {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            body:   body.into(),
        }
    }
}

/// Asynchronous HTTP client abstraction.
///
/// Only a plain GET is needed. Implementations report transport problems
/// (DNS, connect, timeout) as errors and hand back every received response,
/// whatever its status; the [`Fetcher`](crate::Fetcher) decides what counts
/// as success.
pub trait HttpClient: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + 'static;

    fn get(&self, url: &str) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use super::*;
    use crate::error::FetchError;
    use crate::options::FetchOptions;
    use reqwest::Client;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
            let client = Client::builder()
                .timeout(options.timeout)
                .user_agent(options.user_agent.clone())
                .build()
                .map_err(|e| FetchError::Client(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(&self, url: &str) -> Result<Response, Self::Error> {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok(Response { status, body })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
