//! Configuration structures for the pricewatch system.
//!
//! Configuration is an explicit value handed to the collaborators that need
//! it (storage, alert sinks, dashboards). Nothing here reads process-global
//! state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration for the monitoring system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Alert delivery configuration.
    pub alerts: AlertConfig,
    /// Dashboard presentation configuration.
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Parse a configuration from a JSON string.
    ///
    /// Sections missing from the document fall back to their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.storage.db_path.as_os_str().is_empty() {
            return Err(Error::config("storage.db_path must not be empty"));
        }
        if self.alerts.log_dir.as_os_str().is_empty() {
            return Err(Error::config("alerts.log_dir must not be empty"));
        }
        if self.dashboard.top_alerts == 0 {
            return Err(Error::config("dashboard.top_alerts must be at least 1"));
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data").join("price_monitor.db"),
        }
    }
}

/// Alert delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Sender address stamped on outgoing alerts.
    pub sender: String,
    /// Default recipient when the caller does not supply one.
    pub recipient: String,
    /// Directory alert logs are written to.
    pub log_dir: PathBuf,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sender: "price-alerts@company.com".to_string(),
            recipient: "your-email@example.com".to_string(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Dashboard presentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of price-drop alerts shown on the overview.
    pub top_alerts: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { top_alerts: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.db_path, PathBuf::from("data/price_monitor.db"));
        assert_eq!(config.alerts.recipient, "your-email@example.com");
        assert_eq!(config.dashboard.top_alerts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json_str(r#"{"alerts": {"recipient": "ops@shop.test"}}"#)
            .unwrap();
        assert_eq!(config.alerts.recipient, "ops@shop.test");
        assert_eq!(config.alerts.sender, "price-alerts@company.com");
        assert_eq!(config.dashboard.top_alerts, 5);
    }

    #[test]
    fn test_zero_top_alerts_rejected() {
        let err = Config::from_json_str(r#"{"dashboard": {"top_alerts": 0}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
