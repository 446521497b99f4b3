//! Serializable dashboard settings.
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) yields the stock dashboard.
//!
//! ```toml
//! [statements]
//! top_revenue_users = 10
//! top_asset_users = 20
//! histogram_bins = 50
//!
//! [ticker]
//! range = "1y"
//! interval = "1d"
//! timeout_secs = 30
//! ```

use std::path::Path;
use std::time::Duration;

use finboard_core::ticker::yahoo::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use finboard_core::ticker::{HistoryRequest, YahooSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub statements: StatementSettings,
    pub ticker: TickerSettings,
}

impl DashboardConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.statements;
        if s.top_revenue_users == 0 || s.top_asset_users == 0 {
            return Err(ConfigError::Invalid("top-N sizes must be at least 1".into()));
        }
        if s.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be at least 1".into()));
        }
        let t = &self.ticker;
        if t.range.trim().is_empty() || t.interval.trim().is_empty() {
            return Err(ConfigError::Invalid("ticker range and interval must be non-empty".into()));
        }
        if t.timeout_secs == 0 {
            return Err(ConfigError::Invalid("ticker timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

/// Sizes used by the statement overview charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatementSettings {
    /// Slices in the revenue contribution pie.
    pub top_revenue_users: usize,
    /// Bars in the assets vs. liabilities chart.
    pub top_asset_users: usize,
    pub histogram_bins: usize,
}

impl Default for StatementSettings {
    fn default() -> Self {
        Self {
            top_revenue_users: 10,
            top_asset_users: 20,
            histogram_bins: 50,
        }
    }
}

/// Market-data endpoint and history window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TickerSettings {
    pub base_url: String,
    pub range: String,
    pub interval: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for TickerSettings {
    fn default() -> Self {
        let request = HistoryRequest::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            range: request.range,
            interval: request.interval,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TickerSettings {
    pub fn history_request(&self) -> HistoryRequest {
        HistoryRequest {
            range: self.range.clone(),
            interval: self.interval.clone(),
        }
    }

    pub fn yahoo(&self) -> YahooSettings {
        YahooSettings {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.statements.top_revenue_users, 10);
        assert_eq!(config.statements.top_asset_users, 20);
        assert_eq!(config.statements.histogram_bins, 50);
        assert_eq!(config.ticker.history_request(), HistoryRequest::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
[statements]
top_revenue_users = 5

[ticker]
range = "6mo"
"#,
        )
        .unwrap();
        assert_eq!(config.statements.top_revenue_users, 5);
        assert_eq!(config.statements.top_asset_users, 20);
        assert_eq!(config.ticker.range, "6mo");
        assert_eq!(config.ticker.interval, "1d");
        assert_eq!(config.ticker.yahoo().timeout, Duration::from_secs(30));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let err = DashboardConfig::from_toml("[statements]\nhistogram_bins = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = DashboardConfig::from_toml("[ticker]\nrange = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DashboardConfig::from_toml("[statements]\ntop_users = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finboard.toml");
        std::fs::write(&path, "[statements]\ntop_asset_users = 7\n").unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.statements.top_asset_users, 7);

        let missing = DashboardConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
