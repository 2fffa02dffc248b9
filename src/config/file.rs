//! Configuration file management.
//!
//! Loads settings from `~/.hubmove/config.json`. Every field is
//! optional; command-line flags and `HUBMOVE_*` environment variables take
//! precedence over anything stored here.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubmoveConfig {
    #[serde(default)]
    pub hub_id: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    /// Base URL of the content API
    #[serde(default)]
    pub api_url: Option<String>,

    /// OAuth token endpoint
    #[serde(default)]
    pub auth_url: Option<String>,

    /// Directory for action logs written without an explicit `--log-file`
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// Get the config file path.
fn config_path() -> Result<PathBuf> {
    super::global_hubmove_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Load the configuration from its default location.
///
/// A missing file yields the default (empty) configuration.
pub fn load_config() -> Result<HubmoveConfig> {
    load_config_from(&config_path()?)
}

/// Load the configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<HubmoveConfig> {
    if !path.exists() {
        return Ok(HubmoveConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, HubmoveConfig::default());
    }

    #[test]
    fn test_load_camel_case_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"hubId": "hub-1", "clientId": "client", "logDir": "/var/log/hubmove"}"#,
        )
        .unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded,
            HubmoveConfig {
                hub_id: Some("hub-1".to_string()),
                client_id: Some("client".to_string()),
                log_dir: Some(PathBuf::from("/var/log/hubmove")),
                ..HubmoveConfig::default()
            }
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
