//! # Auth Commands
//!
//! ```text
//! ┌──────────┐  login(u, p)   ┌──────────────┐  LOGIN ok   ┌──────────────┐
//! │  Login   │───────────────►│  LOGIN POST  │────────────►│ session set  │
//! │  screen  │◄───────────────│              │             │ (file saved) │
//! └──────────┘  RemoteError   └──────────────┘             └──────┬───────┘
//!      ▲         "Username atau password salah!"                  │
//!      │                                                          ▼
//!      │                       logout()                    POS (data loaded
//!      └────────────────── session, snapshot, cart ◄────── by refresh())
//!                          and report cache dropped
//! ```

use tracing::{info, instrument};

use amsa_client::{submit, Action, LoginPayload, LoginReply, SheetBackend};
use amsa_core::{User, View};

use crate::error::{ApiError, ApiResult};
use crate::PosApp;

impl<B: SheetBackend> PosApp<B> {
    /// Checks credentials against the sheet and starts a session.
    ///
    /// The caller refreshes afterwards to load the shop's data.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Username and password are required"));
        }

        let payload = LoginPayload {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = submit(&self.backend, Action::Login, &payload).await?;
        let user = LoginReply::from_response(&response)?.user;

        self.session.set(user.clone())?;
        info!(username = %user.username, role = ?user.role, "Logged in");
        Ok(user)
    }

    /// Ends the session and forgets all loaded data.
    pub fn logout(&self) -> ApiResult<()> {
        self.session.clear()?;
        self.snapshot.clear();
        self.cart.clear()?;
        self.reports.clear();
        info!("Logged out");
        Ok(())
    }

    /// User remembered from the last launch, if any.
    pub fn restore_session(&self) -> ApiResult<Option<User>> {
        self.session.restore()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current()
    }

    /// Logged-in user, if allowed to open `view`.
    pub fn require_view(&self, view: View) -> ApiResult<User> {
        self.session.require_view(view)
    }
}
