//! Cache-aside resource loading
//!
//! `ResourceFetcher::get` consults the `TtlCache` first and only goes to the
//! network on a miss. The raw response body, not the decoded value, is what
//! gets cached, so the cache stays independent of the payload types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::cache::TtlCache;

/// Default timeout for a single network request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when loading a resource
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote reported that the resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote answered with an error status other than 404
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// HTTP request failed before a response was read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status code and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Network collaborator used on cache misses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET for `url` and reads the full body
    async fn fetch(&self, url: &str) -> Result<RawResponse, reqwest::Error>;
}

/// `Transport` backed by a reqwest client with a fixed request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<RawResponse, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}

/// Loads resources by URL through the response cache
pub struct ResourceFetcher {
    cache: TtlCache,
    transport: Box<dyn Transport>,
}

impl ResourceFetcher {
    /// Creates a fetcher that owns `cache` and issues misses through `transport`
    pub fn new(cache: TtlCache, transport: impl Transport + 'static) -> Self {
        Self {
            cache,
            transport: Box::new(transport),
        }
    }

    /// The cache backing this fetcher
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Fetch the resource at `url`, decoded as `T`
    ///
    /// # Arguments
    /// * `url` - Absolute resource URL, also used as the cache key
    ///
    /// # Returns
    /// * `Ok(T)` - Decoded from cached bytes on a hit, or from a fresh response
    /// * `Err(FetchError)` - If the request fails or the payload does not decode
    ///
    /// Only successfully decoded responses are cached.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        if let Some(bytes) = self.cache.get(url) {
            debug!(url, "Cache hit");
            return Ok(serde_json::from_slice(&bytes)?);
        }

        debug!(url, "Cache miss, fetching");
        let response = self.transport.fetch(url).await?;
        debug!(url, status = response.status, "Received response");

        if response.status == StatusCode::NOT_FOUND.as_u16() {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !(200..300).contains(&response.status) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        let value = serde_json::from_slice(&response.body)?;
        self.cache.add(url, response.body);

        Ok(value)
    }
}
