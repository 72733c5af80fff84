//! # Session Store
//!
//! Remembers who is logged in between launches.
//!
//! ```text
//! login ok ──► save(user) ──► <data dir>/session.json
//! launch   ──► load()     ──► Some(user) → straight to POS
//!                          └─► None       → login screen
//! logout   ──► clear()    ──► file removed
//! ```
//!
//! Only the username and role are stored, never the password.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use amsa_core::User;

use crate::config::project_dirs;
use crate::error::{ClientError, ClientResult};

/// Session file name inside the project data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// File-backed store for the logged-in user.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn default_location() -> ClientResult<Self> {
        project_dirs()
            .map(|dirs| Self::new(dirs.data_dir().join(SESSION_FILE_NAME)))
            .ok_or_else(|| ClientError::SessionIo("No data directory available".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved user, if any.
    ///
    /// A corrupt file is logged and treated as logged out.
    pub fn load(&self) -> ClientResult<Option<User>> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No saved session");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::SessionIo(e.to_string()))?;

        match serde_json::from_str::<User>(&contents) {
            Ok(user) => {
                debug!(username = %user.username, "Restored session");
                Ok(Some(user))
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    /// Saves the logged-in user.
    pub fn save(&self, user: &User) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ClientError::SessionIo(e.to_string()))?;
        }

        let contents = serde_json::to_string(user)
            .map_err(|e| ClientError::SerializationFailed(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| ClientError::SessionIo(e.to_string()))?;

        info!(username = %user.username, role = ?user.role, "Session saved");
        Ok(())
    }

    /// Forgets the logged-in user. Clearing twice is fine.
    pub fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::SessionIo(e.to_string())),
        }
    }
}
