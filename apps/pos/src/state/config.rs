//! # Configuration State
//!
//! Store identity, report preferences and the endpoint setting, loaded at
//! startup from [`ClientConfig`].
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`AMSA_*`)
//! 2. Config file (`amsa.toml`)
//! 3. Defaults
//!
//! ## Thread Safety
//! Read on almost every command, written only from the settings screen,
//! so it sits behind an `RwLock`.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use amsa_client::config::validate_api_url;
use amsa_client::ClientConfig;
use amsa_core::{ProfitMethod, Rupiah};

use crate::error::ApiResult;

/// What the settings modal shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub store_name: String,
    /// URL saved by the owner; `None` means the built-in one is used.
    pub api_url: Option<String>,
    pub effective_api_url: String,
    /// False shows the "Mode Demo" banner.
    pub connected: bool,
    pub demo: bool,
    pub profit_method: ProfitMethod,
}

#[derive(Debug)]
pub struct ConfigState {
    config: RwLock<ClientConfig>,
    /// Where settings are written back; `None` uses the platform default.
    path: Option<PathBuf>,
}

impl ConfigState {
    pub fn new(config: ClientConfig) -> Self {
        ConfigState {
            config: RwLock::new(config),
            path: None,
        }
    }

    /// Saves settings to `path` instead of the platform config dir.
    pub fn with_path(config: ClientConfig, path: impl Into<PathBuf>) -> Self {
        ConfigState {
            config: RwLock::new(config),
            path: Some(path.into()),
        }
    }

    pub fn get(&self) -> ClientConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn store_name(&self) -> String {
        self.get().store.name
    }

    pub fn profit_method(&self) -> ProfitMethod {
        self.get().profit_method()
    }

    /// `Rp 1.500.000`, the way every screen prints money.
    pub fn format_amount(&self, amount: Rupiah) -> String {
        amount.to_string()
    }

    pub fn settings(&self) -> SettingsView {
        let config = self.get();
        SettingsView {
            store_name: config.store.name.clone(),
            api_url: config.api.url.clone(),
            effective_api_url: config.effective_api_url().to_string(),
            connected: config.is_connected(),
            demo: config.is_demo(),
            profit_method: config.profit_method(),
        }
    }

    /// Saves the endpoint URL from the settings modal.
    ///
    /// Blank clears it (back to the built-in URL). The new URL is used by
    /// backends built after this call; the running one is not swapped.
    pub fn update_api_url(&self, url: &str) -> ApiResult<SettingsView> {
        let mut updated = self.get();
        updated.set_api_url(url);
        if let Some(url) = updated.api.url.as_deref() {
            validate_api_url(url)?;
        }
        self.persist(updated)?;
        info!(connected = self.get().is_connected(), "API URL updated");
        Ok(self.settings())
    }

    /// Switches the headline profit formula.
    pub fn update_profit_method(&self, method: ProfitMethod) -> ApiResult<SettingsView> {
        let mut updated = self.get();
        updated.reports.profit_method = method;
        self.persist(updated)?;
        info!(%method, "Profit method updated");
        Ok(self.settings())
    }

    fn persist(&self, updated: ClientConfig) -> ApiResult<()> {
        updated.save(self.path.clone())?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = updated;
        Ok(())
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use amsa_client::config::read_config_file;

    #[test]
    fn test_default_settings() {
        let state = ConfigState::default();
        let settings = state.settings();
        assert_eq!(settings.store_name, "Amsa Mart");
        assert!(!settings.connected);
        assert_eq!(settings.profit_method, ProfitMethod::NetWorth);
        assert_eq!(state.format_amount(Rupiah::new(1_500_000)), "Rp 1.500.000");
    }

    #[test]
    fn test_update_api_url_saves_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amsa.toml");
        let state = ConfigState::with_path(ClientConfig::default(), &path);

        let settings = state
            .update_api_url("  https://script.google.com/macros/s/abc/exec ")
            .unwrap();
        assert!(settings.connected);
        assert_eq!(
            read_config_file(&path).unwrap().api.url.as_deref(),
            Some("https://script.google.com/macros/s/abc/exec")
        );

        let settings = state.update_api_url("").unwrap();
        assert!(!settings.connected);
        assert_eq!(settings.api_url, None);
    }

    #[test]
    fn test_bad_url_is_rejected_and_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amsa.toml");
        let state = ConfigState::with_path(ClientConfig::default(), &path);

        let err = state.update_api_url("ftp://example.com").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(!path.exists());
        assert!(!state.settings().connected);
    }

    #[test]
    fn test_update_profit_method() {
        let dir = tempfile::tempdir().unwrap();
        let state = ConfigState::with_path(ClientConfig::default(), dir.path().join("amsa.toml"));
        state.update_profit_method(ProfitMethod::CashFlow).unwrap();
        assert_eq!(state.profit_method(), ProfitMethod::CashFlow);
    }
}
