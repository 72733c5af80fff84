//! # Commands Module
//!
//! Everything the screens can ask the POS to do, as methods on
//! [`PosApp`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (shared mutation path)
//! ├── auth.rs       ◄─── login, logout, restore_session, require_view
//! ├── inventory.rs  ◄─── refresh, search, low stock, product CRUD, restock
//! ├── cart.rs       ◄─── cart manipulation
//! ├── sale.rs       ◄─── checkout → receipt
//! ├── ledger.rs     ◄─── cash book, capital, expense, prive, edits
//! ├── reports.rs    ◄─── financial report
//! └── admin.rs      ◄─── settings, reset users
//! ```
//!
//! ## Role Gates
//! ```text
//! command group        view required     admin  kasir  manager
//! ─────────────────    ──────────────    ─────  ─────  ───────
//! catalog + cart       POS                 ✓      ✓       ✓
//! checkout             POS                 ✓      ✓       ✓
//! product CRUD/restock INVENTORY           ✓      ✗       ✗
//! cash book            LEDGER              ✓      ✗       ✗
//! reports              REPORTS             ✓      ✗       ✗
//! settings, users      (settings)          ✓      ✗       ✗
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod inventory;
pub mod ledger;
pub mod reports;
pub mod sale;

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use amsa_client::{submit, Action, SheetBackend};

use crate::error::ApiResult;
use crate::state::LoadOutcome;
use crate::PosApp;

pub use ledger::CashBook;
pub use sale::{Receipt, ReceiptLine};

/// What a successful mutation reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    /// Id of the row the sheet created, when it says.
    pub id: Option<String>,
    /// Confirmation text from the sheet.
    pub message: Option<String>,
    /// How the follow-up refresh went.
    pub refresh: LoadOutcome,
}

impl<B: SheetBackend> PosApp<B> {
    /// One POST, then a refresh.
    ///
    /// A rejected POST returns before the refresh; the snapshot is left as
    /// it was.
    pub(crate) async fn mutate<P>(&self, action: Action, payload: &P) -> ApiResult<MutationResult>
    where
        P: Serialize + ?Sized,
    {
        let response = submit(&self.backend, action, payload).await?;
        let refresh = self.refresh().await;
        debug!(
            %action,
            inventory = action.touches_inventory(),
            ledger = action.touches_ledger(),
            version = refresh.version(),
            "Mutation applied"
        );
        Ok(MutationResult {
            id: response.id,
            message: response.message,
            refresh,
        })
    }
}
