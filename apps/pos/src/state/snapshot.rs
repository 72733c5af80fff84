//! # Snapshot State
//!
//! The last good copy of the two sheets.
//!
//! ## Refresh Outcomes
//! ```text
//! refresh()
//!    │
//!    ├── both GETs ok ──────► replace(), version + 1 ──► LoadOutcome::Fresh
//!    │
//!    └── either GET fails ──► snapshot untouched ──────► LoadOutcome::Stale
//!                             (empty on first load)       { message } → toast
//! ```
//!
//! Every report and cart lookup reads from here. The version number lets
//! the report cache tell an old snapshot from a new one.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use amsa_core::{LedgerEntry, Product};

/// Inventory and ledger as last fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub inventory: Vec<Product>,
    pub ledger: Vec<LedgerEntry>,
    /// 0 until the first successful load.
    pub version: u64,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.inventory.iter().find(|p| p.id == id)
    }

    pub fn ledger_entry(&self, id: &str) -> Option<&LedgerEntry> {
        self.ledger.iter().find(|e| e.id == id)
    }

    /// False until something has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}

/// Result of a refresh, shown to the user when stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LoadOutcome {
    /// New data loaded.
    Fresh {
        #[ts(type = "number")]
        version: u64,
    },
    /// Fetch failed; still showing `version`.
    Stale {
        #[ts(type = "number")]
        version: u64,
        message: String,
    },
}

impl LoadOutcome {
    pub fn is_fresh(&self) -> bool {
        matches!(self, LoadOutcome::Fresh { .. })
    }

    pub fn version(&self) -> u64 {
        match self {
            LoadOutcome::Fresh { version } | LoadOutcome::Stale { version, .. } => *version,
        }
    }
}

/// Shared snapshot, swapped whole on every successful refresh.
///
/// Writers replace the `Arc` in one assignment, so a lock poisoned by a
/// panicking reader still guards consistent data and is simply reused.
#[derive(Debug, Default)]
pub struct SnapshotState {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheap handle to the current snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn version(&self) -> u64 {
        self.current().version
    }

    /// Installs freshly fetched data and returns the new version.
    pub fn replace(&self, inventory: Vec<Product>, ledger: Vec<LedgerEntry>) -> u64 {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = guard.version + 1;
        *guard = Arc::new(Snapshot {
            inventory,
            ledger,
            version,
            loaded_at: Some(Utc::now()),
        });
        version
    }

    /// Forgets everything (logout). The version keeps counting up.
    pub fn clear(&self) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(Snapshot {
            version: guard.version + 1,
            ..Snapshot::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_until_loaded() {
        let state = SnapshotState::new();
        let snapshot = state.current();
        assert!(!snapshot.is_loaded());
        assert!(snapshot.inventory.is_empty());
        assert_eq!(snapshot.version, 0);
    }

    #[test]
    fn test_replace_bumps_version() {
        let state = SnapshotState::new();
        let product = Product::new("1", "BRG001", "Indomie Goreng", 2500, 3500, 100);

        assert_eq!(state.replace(vec![product], Vec::new()), 1);
        assert_eq!(state.replace(Vec::new(), Vec::new()), 2);
        assert!(state.current().is_loaded());
    }

    #[test]
    fn test_old_handle_survives_replace() {
        let state = SnapshotState::new();
        let product = Product::new("1", "BRG001", "Indomie Goreng", 2500, 3500, 100);
        state.replace(vec![product], Vec::new());

        let old = state.current();
        state.replace(Vec::new(), Vec::new());
        assert_eq!(old.inventory.len(), 1);
        assert!(old.product("1").is_some());
        assert!(state.current().product("1").is_none());
    }

    #[test]
    fn test_clear_keeps_counting() {
        let state = SnapshotState::new();
        state.replace(Vec::new(), Vec::new());
        state.clear();
        assert_eq!(state.version(), 2);
        assert!(!state.current().is_loaded());
    }
}
