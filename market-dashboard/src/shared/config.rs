/// Dashboard configuration from environment variables
///
/// | Variable             | Default                 |
/// |----------------------|-------------------------|
/// | `MARKET_API_URL`     | `http://localhost:8000` |
/// | `POLL_INTERVAL_SECS` | `60`                    |
/// | `SUMMARY_LIVE`       | `false`                 |
/// | `HTTP_TIMEOUT_SECS`  | unset (transport default) |
/// | `INDICES_LIMIT`      | unset (show all)        |
/// | `SECTORS_LIMIT`      | unset (show all)        |
/// | `DASHBOARD_LOG_FILE` | `market-dashboard.log`  |
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::backend::BackendConfig;
use super::error::ConfigError;
use super::poller::PollerConfig;
use super::render::DisplayLimits;

/// Complete dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub backend: BackendConfig,
    pub poller: PollerConfig,
    pub limits: DisplayLimits,
    pub log_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poller: PollerConfig::default(),
            limits: DisplayLimits::default(),
            log_file: PathBuf::from("market-dashboard.log"),
        }
    }
}

impl DashboardConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(raw) = var("MARKET_API_URL") {
            let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
                var: "MARKET_API_URL",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            if url.cannot_be_a_base() {
                return Err(ConfigError::InvalidUrl {
                    var: "MARKET_API_URL",
                    value: raw,
                    reason: "cannot be a base".to_string(),
                });
            }
            config.backend.base_url = url;
        }

        if let Some(raw) = var("POLL_INTERVAL_SECS") {
            let secs = positive("POLL_INTERVAL_SECS", &raw)?;
            config.poller = config.poller.with_interval(Duration::from_secs(secs as u64));
        }

        if let Some(raw) = var("SUMMARY_LIVE") {
            config.backend.live = matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }

        if let Some(raw) = var("HTTP_TIMEOUT_SECS") {
            let secs = positive("HTTP_TIMEOUT_SECS", &raw)?;
            config.backend.timeout = Some(Duration::from_secs(secs as u64));
        }

        if let Some(raw) = var("INDICES_LIMIT") {
            config.limits.indices = Some(positive("INDICES_LIMIT", &raw)?);
        }

        if let Some(raw) = var("SECTORS_LIMIT") {
            config.limits.sectors = Some(positive("SECTORS_LIMIT", &raw)?);
        }

        if let Some(raw) = var("DASHBOARD_LOG_FILE") {
            config.log_file = PathBuf::from(raw);
        }

        Ok(config)
    }

    /// Set backend base URL
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.backend.base_url = base_url;
        self
    }

    /// Set poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poller.interval = interval;
        self
    }

    /// Set display truncation
    pub fn with_limits(mut self, limits: DisplayLimits) -> Self {
        self.limits = limits;
        self
    }
}

fn positive(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: raw.to_string(),
        }),
    }
}
