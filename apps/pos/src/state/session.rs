//! # Session State
//!
//! Who is logged in, and which screens they may open.
//!
//! The user is mirrored to a [`SessionStore`] file when one is configured,
//! so a relaunch skips the login screen.

use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use amsa_client::SessionStore;
use amsa_core::{User, View};

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Default)]
pub struct SessionState {
    user: RwLock<Option<User>>,
    store: Option<SessionStore>,
}

impl SessionState {
    /// In-memory only; nothing survives a restart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persisted through `store`.
    pub fn with_store(store: SessionStore) -> Self {
        SessionState {
            user: RwLock::new(None),
            store: Some(store),
        }
    }

    pub fn current(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records a successful login.
    pub fn set(&self, user: User) -> ApiResult<()> {
        if let Some(store) = &self.store {
            store.save(&user)?;
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
        Ok(())
    }

    /// Logs out. The in-memory user is dropped even when the file cannot
    /// be removed.
    pub fn clear(&self) -> ApiResult<()> {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(store) = &self.store {
            store.clear()?;
        }
        Ok(())
    }

    /// Loads the saved user, if any, into memory.
    pub fn restore(&self) -> ApiResult<Option<User>> {
        let Some(store) = &self.store else {
            return Ok(self.current());
        };
        let restored = store.load()?;
        if let Some(user) = &restored {
            debug!(username = %user.username, "Session restored");
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = restored.clone();
        Ok(restored)
    }

    /// Logged-in user allowed to open `view`.
    pub fn require_view(&self, view: View) -> ApiResult<User> {
        let user = self.current().ok_or_else(ApiError::unauthorized)?;
        if !user.can_access(view) {
            warn!(username = %user.username, role = ?user.role, ?view, "View denied");
            return Err(ApiError::forbidden(format!(
                "Role {:?} cannot open {:?}",
                user.role, view
            )));
        }
        Ok(user)
    }

    /// Logged-in user allowed to change settings.
    pub fn require_settings(&self) -> ApiResult<User> {
        let user = self.current().ok_or_else(ApiError::unauthorized)?;
        if !user.role.can_manage_settings() {
            return Err(ApiError::forbidden("Only the admin can change settings"));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use amsa_core::UserRole;

    #[test]
    fn test_view_gating() {
        let session = SessionState::new();
        assert_eq!(
            session.require_view(View::Pos).unwrap_err().code,
            ErrorCode::Unauthorized
        );

        session.set(User::new("Kasir", UserRole::Kasir)).unwrap();
        assert!(session.require_view(View::Pos).is_ok());
        assert_eq!(
            session.require_view(View::Reports).unwrap_err().code,
            ErrorCode::Forbidden
        );
        assert!(session.require_settings().is_err());

        session.set(User::new("Admin", UserRole::Admin)).unwrap();
        assert!(session.require_view(View::Ledger).is_ok());
        assert!(session.require_settings().is_ok());
    }

    #[test]
    fn test_persisted_session_restores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let first = SessionState::with_store(SessionStore::new(&path));
        first.set(User::new("Manager", UserRole::Manager)).unwrap();

        let second = SessionState::with_store(SessionStore::new(&path));
        assert_eq!(second.current(), None);
        let restored = second.restore().unwrap().unwrap();
        assert_eq!(restored.role, UserRole::Manager);
        assert_eq!(second.current(), Some(restored));

        second.clear().unwrap();
        assert!(!path.exists());
    }
}
