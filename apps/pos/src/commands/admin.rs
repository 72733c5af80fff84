//! # Admin Commands
//!
//! Settings modal and user maintenance. Admin only.

use serde_json::json;
use tracing::{info, instrument};

use amsa_client::{Action, SheetBackend};
use amsa_core::ProfitMethod;

use crate::commands::MutationResult;
use crate::error::{ApiError, ApiResult};
use crate::state::SettingsView;
use crate::PosApp;

impl<B: SheetBackend> PosApp<B> {
    /// Current settings. Anyone logged in may look (the demo banner
    /// depends on it).
    pub fn settings(&self) -> ApiResult<SettingsView> {
        self.session
            .current()
            .ok_or_else(ApiError::unauthorized)?;
        Ok(self.config.settings())
    }

    /// Saves the endpoint URL. Blank goes back to the built-in one.
    ///
    /// Takes effect the next time the POS is launched.
    #[instrument(skip(self))]
    pub fn save_api_url(&self, url: &str) -> ApiResult<SettingsView> {
        self.session.require_settings()?;
        self.config.update_api_url(url)
    }

    pub fn set_profit_method(&self, method: ProfitMethod) -> ApiResult<SettingsView> {
        self.session.require_settings()?;
        self.config.update_profit_method(method)
    }

    /// Restores the sheet's default user accounts.
    #[instrument(skip(self))]
    pub async fn reset_users(&self) -> ApiResult<MutationResult> {
        let admin = self.session.require_settings()?;
        info!(by = %admin.username, "Resetting users");
        self.mutate(Action::ResetUsers, &json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::{ConfigState, SessionState};
    use crate::test_support::app_as;
    use amsa_client::{ClientConfig, MemoryBackend};
    use amsa_core::{User, UserRole};

    #[tokio::test]
    async fn test_reset_users_is_admin_only() {
        let kasir = app_as(UserRole::Kasir).await;
        assert_eq!(
            kasir.reset_users().await.unwrap_err().code,
            ErrorCode::Forbidden
        );

        let admin = app_as(UserRole::Admin).await;
        let result = admin.reset_users().await.unwrap();
        assert!(result.message.is_some());
    }

    #[tokio::test]
    async fn test_save_api_url() {
        let dir = tempfile::tempdir().unwrap();
        let app = PosApp::new(
            MemoryBackend::with_demo_data(),
            ConfigState::with_path(ClientConfig::default(), dir.path().join("amsa.toml")),
            SessionState::new(),
        );
        assert_eq!(app.settings().unwrap_err().code, ErrorCode::Unauthorized);

        app.session
            .set(User::new("Admin", UserRole::Admin))
            .unwrap();
        assert!(!app.settings().unwrap().connected);

        let settings = app
            .save_api_url(" https://script.google.com/macros/s/xyz/exec ")
            .unwrap();
        assert!(settings.connected);
        assert_eq!(
            settings.effective_api_url,
            "https://script.google.com/macros/s/xyz/exec"
        );

        let settings = app.set_profit_method(ProfitMethod::CashFlowPlusStock).unwrap();
        assert_eq!(settings.profit_method, ProfitMethod::CashFlowPlusStock);
    }

    #[tokio::test]
    async fn test_manager_cannot_change_url() {
        let app = app_as(UserRole::Manager).await;
        assert_eq!(
            app.save_api_url("https://example.com/exec").unwrap_err().code,
            ErrorCode::Forbidden
        );
    }
}
