/// Error types for backend round-trips and configuration
///
/// Every failure a polling cycle or watchlist action can hit collapses into
/// [`FetchError`]. None of them are fatal: the poller and the watchlist worker
/// catch them at their boundary and surface them as a status message.
use thiserror::Error;

/// All errors produced while talking to the market-data backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure (connect refused, reset, timeout, ...)
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Body was not valid JSON, or not the shape we need at the top level
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    /// Short label for the status indicator.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::HttpStatus { .. } => "http",
            FetchError::Parse(_) => "parse",
        }
    }

    /// Check if the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::HttpStatus { status: 404, .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::HttpStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Invalid environment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a valid URL ({reason})")]
    InvalidUrl {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid {var}: {value:?} is not a positive integer")]
    InvalidNumber { var: &'static str, value: String },
}
