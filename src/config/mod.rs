//! Configuration management.
//!
//! Resolves hub credentials, API endpoints and action log locations.
//!
//! Precedence for every setting:
//! 1. Command-line flag
//! 2. `HUBMOVE_*` environment variable (wired through clap `env`)
//! 3. `~/.hubmove/config.json`
//! 4. Built-in default, where one exists
//!
//! Destination credentials for moves and reverts fall back to the source
//! credentials field by field.

mod file;

pub use file::{load_config, load_config_from, HubmoveConfig};

use crate::error::{Error, Result};

use std::path::PathBuf;

/// Default content API base URL.
pub const DEFAULT_API_URL: &str = "https://api.amplience.net/v2/content";

/// Default OAuth token endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://auth.amplience.net/oauth/token";

/// Credentials for one hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub hub_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Resolve source credentials from flags (or env) and the config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] naming the first missing value.
    pub fn resolve(
        hub_id: Option<&str>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
        config: &HubmoveConfig,
    ) -> Result<Self> {
        let pick = |flag: Option<&str>, stored: &Option<String>, what: &'static str| {
            flag.map(str::to_string)
                .or_else(|| stored.clone())
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingCredentials(what))
        };

        Ok(Self {
            hub_id: pick(hub_id, &config.hub_id, "a hub id")?,
            client_id: pick(client_id, &config.client_id, "a client id")?,
            client_secret: pick(client_secret, &config.client_secret, "a client secret")?,
        })
    }

    /// Destination credentials, each field defaulting to this (source) value.
    #[must_use]
    pub fn destination(
        &self,
        hub_id: Option<&str>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Self {
        Self {
            hub_id: hub_id.map_or_else(|| self.hub_id.clone(), str::to_string),
            client_id: client_id.map_or_else(|| self.client_id.clone(), str::to_string),
            client_secret: client_secret.map_or_else(|| self.client_secret.clone(), str::to_string),
        }
    }
}

/// API and auth URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub auth_url: String,
}

impl Endpoints {
    #[must_use]
    pub fn resolve(api_url: Option<&str>, auth_url: Option<&str>, config: &HubmoveConfig) -> Self {
        Self {
            api_url: api_url
                .map(str::to_string)
                .or_else(|| config.api_url.clone())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: auth_url
                .map(str::to_string)
                .or_else(|| config.auth_url.clone())
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
        }
    }
}

/// Get the global hubmove directory (`~/.hubmove/`).
#[must_use]
pub fn global_hubmove_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".hubmove"))
}

/// Default path for a new action log.
///
/// `<log_dir>/<scope>-<action>-<unix millis>.log`, where `log_dir` is taken
/// from the config file, then `~/.hubmove/logs`, then `./logs`.
#[must_use]
pub fn default_log_path(scope: &str, action: &str, config: &HubmoveConfig) -> PathBuf {
    let dir = config
        .log_dir
        .clone()
        .or_else(|| global_hubmove_dir().map(|d| d.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"));

    let stamp = chrono::Utc::now().timestamp_millis();
    dir.join(format!("{scope}-{action}-{stamp}.log"))
}
