//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with timeout, optional proxy and user agent
//! - GET requests for listing and thread pages
//! - Error classification into `FetchError`
//!
//! Everything above this module talks to the `DocumentFetcher` trait, so the
//! pipeline can be driven by any page source.

use crate::config::CrawlerConfig;
use async_trait::async_trait;
use reqwest::{Client, Proxy};
use std::time::Duration;
use thiserror::Error;

/// A fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URI that was requested
    pub request_uri: String,
    /// Final URI after redirects
    pub final_uri: String,
    /// HTTP status code
    pub status_code: u16,
    /// Raw page body
    pub body: String,
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchErrorKind {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// A failed fetch of one URI
///
/// Fetch errors are never fatal to a run; they are logged and the URI simply
/// contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fetch failed for {uri}: {kind}")]
pub struct FetchError {
    pub uri: String,
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(uri: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self {
            uri: uri.into(),
            kind,
        }
    }
}

/// Source of pages for the orchestrator
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetches `uri`, returning the raw page or the reason it failed
    async fn fetch(&self, uri: &str) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (timeout, proxy, user agent)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (bad proxy, TLS init)
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    builder.build()
}

/// `DocumentFetcher` backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedPage, FetchError> {
        fetch_url(&self.client, uri).await
    }
}

/// Fetches a URL and classifies any failure
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | Other status | `FetchErrorKind::Status` |
/// | Timeout | `FetchErrorKind::Timeout` |
/// | Connection refused / DNS | `FetchErrorKind::Connect` |
/// | Body decode failure | `FetchErrorKind::Body` |
///
/// There is no retry: a failed URI is lost for this run.
pub async fn fetch_url(client: &Client, uri: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(uri)
        .send()
        .await
        .map_err(|e| FetchError::new(uri, classify_error(&e)))?;

    let status = response.status();
    let final_uri = response.url().to_string();

    if !status.is_success() {
        return Err(FetchError::new(uri, FetchErrorKind::Status(status.as_u16())));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::new(uri, FetchErrorKind::Body(e.to_string())))?;

    Ok(FetchedPage {
        request_uri: uri.to_string(),
        final_uri,
        status_code: status.as_u16(),
        body,
    })
}

fn classify_error(e: &reqwest::Error) -> FetchErrorKind {
    if e.is_timeout() {
        FetchErrorKind::Timeout
    } else if e.is_connect() {
        FetchErrorKind::Connect(e.to_string())
    } else {
        FetchErrorKind::Request(e.to_string())
    }
}
