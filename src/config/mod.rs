//! Optional YAML configuration.
//!
//! All fields have working defaults; a missing file is not an error unless
//! the user named one explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::BlescopeError;

const DEFAULT_CONFIG_FILE: &str = "blescope.yaml";
const MAX_CONFIG_SIZE: u64 = 1_048_576;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BlescopeConfig {
    pub scan: ScanConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Discovery window in seconds.
    pub duration_secs: f64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            duration_secs: 5.0,
            connect_timeout_secs: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

pub async fn load_config(path: Option<&Path>) -> Result<BlescopeConfig, BlescopeError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if !path.exists() {
        if required {
            return Err(BlescopeError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(BlescopeConfig::default());
    }

    let metadata = tokio::fs::metadata(&path).await?;
    if metadata.len() > MAX_CONFIG_SIZE {
        return Err(BlescopeError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(&path).await?;
    let config: BlescopeConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = BlescopeConfig::default();
        assert_eq!(config.scan.duration_secs, 5.0);
        assert_eq!(config.scan.connect_timeout_secs, 10.0);
        assert_eq!(config.logging.log_dir, PathBuf::from("./logs"));
        assert_eq!(config.dashboard.port, 8080);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config: BlescopeConfig =
            serde_yaml::from_str("scan:\n  duration_secs: 12.5\n").unwrap();
        assert_eq!(config.scan.duration_secs, 12.5);
        assert_eq!(config.scan.connect_timeout_secs, 10.0);
        assert_eq!(config.dashboard.host, "127.0.0.1");
    }
}
