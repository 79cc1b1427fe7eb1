//! Configuration for the HAP API client.

use crate::error::{HapError, HapResult};
use std::time::Duration;

/// Default base for the open API.
pub const DEFAULT_API_BASE: &str = "https://api.mingdao.com";
/// Default base for the report API (pivot data).
pub const DEFAULT_REPORT_BASE: &str = "https://api2.mingdao.com";

/// Environment variables read by [`ApiConfig::from_env`].
pub const ENV_APP_KEY: &str = "HAP_APP_KEY";
pub const ENV_SIGN: &str = "HAP_SIGN";
pub const ENV_HOST: &str = "HAP_HOST";

/// Credentials and host selection for one HAP application.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Application key.
    pub app_key: String,
    /// Request signature paired with the key.
    pub sign: String,
    /// Optional private-deployment host, e.g. `https://hap.example.com`.
    /// When set, API calls go to `{host}/api` instead of the public cloud.
    pub host: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(app_key: impl Into<String>, sign: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            sign: sign.into(),
            host: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read credentials from the environment (`HAP_APP_KEY`, `HAP_SIGN`,
    /// optional `HAP_HOST`).
    pub fn from_env() -> HapResult<Self> {
        let app_key = std::env::var(ENV_APP_KEY)
            .map_err(|_| HapError::Config(format!("{} is not set", ENV_APP_KEY)))?;
        let sign = std::env::var(ENV_SIGN)
            .map_err(|_| HapError::Config(format!("{} is not set", ENV_SIGN)))?;
        let mut config = Self::new(app_key, sign);
        if let Ok(host) = std::env::var(ENV_HOST) {
            if !host.trim().is_empty() {
                config = config.with_host(host);
            }
        }
        Ok(config)
    }

    fn trimmed_host(&self) -> Option<&str> {
        self.host.as_deref().map(|h| h.trim_end_matches('/'))
    }

    /// Base URL for open-API endpoints: custom host + `/api`, or the public
    /// cloud default.
    pub fn api_base(&self) -> String {
        match self.trimmed_host() {
            Some(host) => format!("{}/api", host),
            None => DEFAULT_API_BASE.to_string(),
        }
    }

    /// Full URL of the pivot-data report endpoint, which lives on its own
    /// default host.
    pub fn report_url(&self) -> String {
        let base = self
            .trimmed_host()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_REPORT_BASE.to_string());
        format!("{}/api/report/getPivotData", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_base() {
        let config = ApiConfig::new("k", "s");
        assert_eq!(config.api_base(), "https://api.mingdao.com");
        assert_eq!(
            config.report_url(),
            "https://api2.mingdao.com/api/report/getPivotData"
        );
    }

    #[test]
    fn test_custom_host_gets_api_suffix() {
        let config = ApiConfig::new("k", "s").with_host("https://hap.example.com");
        assert_eq!(config.api_base(), "https://hap.example.com/api");
        assert_eq!(
            config.report_url(),
            "https://hap.example.com/api/report/getPivotData"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ApiConfig::new("k", "s").with_host("https://hap.example.com/");
        assert_eq!(config.api_base(), "https://hap.example.com/api");
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::new("k", "s");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.host.is_none());
    }
}
