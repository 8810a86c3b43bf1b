//! Connection settings for the Firecrawl deep-research API.

use std::time::Duration;

use pipeline::ConfigError;
use reqwest::Url;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";

/// Settings for [`FirecrawlClient`](crate::FirecrawlClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirecrawlConfig {
    /// API root, without the `/v1` suffix.
    pub base_url: String,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Extra time allowed past the job's own time limit before giving up.
    pub completion_grace: Duration,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Timeout for each individual HTTP request.
    pub request_timeout: Duration,
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(2),
            completion_grace: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl FirecrawlConfig {
    /// Checks the settings and returns the parsed base URL.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unparsable or non-HTTP base URL or
    /// a zero poll interval.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::invalid("research_base_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "research_base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::invalid(
                "poll_interval",
                "must be greater than zero",
            ));
        }
        // Relative joins replace the last path segment unless it ends in '/'.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}
