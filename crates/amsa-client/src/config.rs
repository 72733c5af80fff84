//! # Client Configuration
//!
//! Where the endpoint lives and how the shop wants its numbers shown.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     AMSA_API_URL=https://script.google.com/macros/s/.../exec           │
//! │     AMSA_STORE_NAME="Amsa Mart Cabang 2"                               │
//! │     AMSA_DEMO=1                                                        │
//! │     AMSA_PROFIT_METHOD=net_worth                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/amsa-mart/amsa.toml (Linux)                              │
//! │     ~/Library/Application Support/id.amsa.amsa-mart/amsa.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     built-in Apps Script URL, net-worth profit                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # amsa.toml
//! [store]
//! name = "Amsa Mart"
//!
//! [api]
//! url = "https://script.google.com/macros/s/XXXXX/exec"
//! demo = false
//!
//! [reports]
//! profit_method = "net_worth"
//! ```
//!
//! An empty or missing `api.url` means "use the built-in URL". The POS
//! still works in that state but shows the demo-mode banner, because nobody
//! has pointed it at their own sheet yet.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use amsa_core::ProfitMethod;

use crate::error::{ClientError, ClientResult};

/// Apps Script deployment used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://script.google.com/macros/s/AKfycbyWd-WKXpRJaRmA3U_EPEz_ny0SjmKuIFKkmfJ95xLGwbHKMwkYkwopuUYtLpHTgpxw0w/exec";

/// Config file name inside the project config directory.
pub const CONFIG_FILE_NAME: &str = "amsa.toml";

// =============================================================================
// Store Settings
// =============================================================================

/// Shop identity shown on screens and receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Amsa Mart".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

// =============================================================================
// API Settings
// =============================================================================

/// Endpoint connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Web-app URL saved from the settings screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Run against in-memory mock data instead of the network.
    #[serde(default)]
    pub demo: bool,
}

// =============================================================================
// Report Settings
// =============================================================================

/// Report preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub profit_method: ProfitMethod,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub reports: ReportSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (amsa.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "store.name must not be empty".into(),
            ));
        }

        if let Some(url) = self.api.url.as_deref() {
            validate_api_url(url)?;
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("AMSA_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.set_api_url(&url);
        }

        if let Ok(name) = std::env::var("AMSA_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(demo) = std::env::var("AMSA_DEMO") {
            match demo.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.api.demo = true,
                "0" | "false" | "no" | "off" => self.api.demo = false,
                _ => warn!(value = %demo, "Unknown AMSA_DEMO value in environment"),
            }
        }

        if let Ok(method) = std::env::var("AMSA_PROFIT_METHOD") {
            match method.parse() {
                Ok(parsed) => {
                    debug!(method = %method, "Overriding profit method from environment");
                    self.reports.profit_method = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring AMSA_PROFIT_METHOD"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// URL requests actually go to: the saved one, else the built-in one.
    pub fn effective_api_url(&self) -> &str {
        self.api.url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// True only when the owner has saved their own endpoint URL.
    ///
    /// False drives the "Mode Demo" banner.
    pub fn is_connected(&self) -> bool {
        self.api.url.is_some()
    }

    /// Saves the settings-screen URL: trimmed, and cleared when blank.
    pub fn set_api_url(&mut self, url: &str) {
        let trimmed = url.trim();
        self.api.url = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn store_name(&self) -> &str {
        &self.store.name
    }

    pub fn profit_method(&self) -> ProfitMethod {
        self.reports.profit_method
    }

    pub fn is_demo(&self) -> bool {
        self.api.demo
    }
}

/// Checks that a URL is an absolute http(s) URL.
pub fn validate_api_url(url: &str) -> ClientResult<Url> {
    let parsed = Url::parse(url.trim())?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ClientError::InvalidUrl(format!(
            "API URL must start with http:// or https://, got scheme '{}'",
            other
        ))),
    }
}

/// Project directories for config and data files.
pub(crate) fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("id", "amsa", "amsa-mart")
}

/// Reads a config from an explicit path without env overrides.
pub fn read_config_file(path: &Path) -> ClientResult<ClientConfig> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
    let config: ClientConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.store_name(), "Amsa Mart");
        assert_eq!(config.effective_api_url(), DEFAULT_API_URL);
        assert!(!config.is_connected());
        assert!(!config.is_demo());
        assert_eq!(config.profit_method(), ProfitMethod::NetWorth);
    }

    #[test]
    fn test_set_api_url_trims_and_clears() {
        let mut config = ClientConfig::default();

        config.set_api_url("  https://script.google.com/macros/s/abc/exec \n");
        assert_eq!(
            config.effective_api_url(),
            "https://script.google.com/macros/s/abc/exec"
        );
        assert!(config.is_connected());

        config.set_api_url("   ");
        assert!(!config.is_connected());
        assert_eq!(config.effective_api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_ok());

        config.set_api_url("ftp://example.com/sheet");
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.set_api_url("not a url");
        assert!(config.validate().is_err());

        config.set_api_url("http://localhost:8080/exec");
        assert!(config.validate().is_ok());

        config.store.name = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = ClientConfig::default();
        config.set_api_url("https://example.com/exec");
        config.store.name = "Amsa Mart Cabang 2".into();
        config.reports.profit_method = ProfitMethod::CashFlow;
        config.save(Some(path.clone())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[store]"));
        assert!(text.contains("profit_method = \"cash_flow\""));

        let loaded = read_config_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[api]\ndemo = true\n").unwrap();

        let loaded = read_config_file(&path).unwrap();
        assert!(loaded.is_demo());
        assert_eq!(loaded.store_name(), "Amsa Mart");
        assert!(!loaded.is_connected());
    }

    #[test]
    fn test_broken_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[api\nurl = ").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(err.is_config_error());
    }
}
