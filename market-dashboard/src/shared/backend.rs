/// HTTP client for the market-data backend
///
/// Endpoints consumed:
/// - `GET    /api/health`
/// - `GET    /api/summary` (or `/api/summary?live=1`)
/// - `GET    /api/watchlist`
/// - `POST   /api/watchlist` with a JSON array of entries
/// - `DELETE /api/watchlist/{symbol}`
/// - `GET    /api/miniquotes?symbols=A,B,C`
///
/// Any non-2xx answer is a [`FetchError::HttpStatus`].
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::error::FetchError;
use super::types::{HealthStatus, Watchlist, WatchlistEntry};

/// Backend operations the dashboard depends on
///
/// Summary and mini quotes come back as raw JSON so the normalizer can
/// tolerate missing fields.
#[async_trait]
pub trait MarketBackend: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, FetchError>;

    async fn summary(&self) -> Result<Value, FetchError>;

    async fn watchlist(&self) -> Result<Watchlist, FetchError>;

    async fn add_to_watchlist(&self, entries: &[WatchlistEntry]) -> Result<Watchlist, FetchError>;

    async fn remove_from_watchlist(&self, symbol: &str) -> Result<Watchlist, FetchError>;

    async fn mini_quotes(&self, symbols: &[String]) -> Result<Value, FetchError>;
}

/// HTTP backend configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://localhost:8000`
    pub base_url: Url,
    /// Ask the backend for live (uncached) summary data
    pub live: bool,
    /// Per-request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:8000").expect("static URL is valid"),
            live: false,
            timeout: None,
        }
    }
}

impl BackendConfig {
    /// Create a new configuration with custom base URL
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Default::default()
        }
    }

    /// Request `?live=1` summaries
    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `reqwest`-backed [`MarketBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: BackendConfig,
    client: Client,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Join path segments onto the base URL, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        endpoint_url(&self.config.base_url, segments)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }
}

/// Build `{base}/seg1/seg2...`, keeping any path prefix of `base`.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            FetchError::Network(format!("base URL cannot carry a path: {}", base))
        })?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

/// Check status, then decode the body as JSON.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl MarketBackend for HttpBackend {
    async fn health(&self) -> Result<HealthStatus, FetchError> {
        let url = self.endpoint(&["api", "health"])?;
        self.get_json(url).await
    }

    async fn summary(&self) -> Result<Value, FetchError> {
        let mut url = self.endpoint(&["api", "summary"])?;
        if self.config.live {
            url.query_pairs_mut().append_pair("live", "1");
        }
        self.get_json(url).await
    }

    async fn watchlist(&self) -> Result<Watchlist, FetchError> {
        let url = self.endpoint(&["api", "watchlist"])?;
        self.get_json(url).await
    }

    async fn add_to_watchlist(&self, entries: &[WatchlistEntry]) -> Result<Watchlist, FetchError> {
        let url = self.endpoint(&["api", "watchlist"])?;
        debug!("POST {} ({} entries)", url, entries.len());
        let response = self.client.post(url).json(entries).send().await?;
        read_json(response).await
    }

    async fn remove_from_watchlist(&self, symbol: &str) -> Result<Watchlist, FetchError> {
        let url = self.endpoint(&["api", "watchlist", symbol])?;
        debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        read_json(response).await
    }

    async fn mini_quotes(&self, symbols: &[String]) -> Result<Value, FetchError> {
        let mut url = self.endpoint(&["api", "miniquotes"])?;
        url.query_pairs_mut()
            .append_pair("symbols", &symbols.join(","));
        self.get_json(url).await
    }
}
