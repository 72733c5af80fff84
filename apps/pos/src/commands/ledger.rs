//! # Ledger Commands
//!
//! The cash book: listing, capital in, expenses out, owner withdrawals,
//! and corrections.
//!
//! ## Withdrawal Guard
//! ```text
//! withdraw_profit(amount)
//!      │
//!      ▼
//! saldoKas of the CURRENT snapshot
//!      │
//!      ├── amount > saldoKas ──► INSUFFICIENT_CASH, nothing sent
//!      │
//!      └── ok ──► WITHDRAW_PROFIT { kredit: amount, kategori: "Prive" }
//!                      │
//!                      ▼
//!                  refresh() ──► reports recomputed on the new version
//! ```
//!
//! The check runs on the last snapshot, which may be stale after a failed
//! refresh.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};
use ts_rs::TS;

use amsa_client::{Action, IdPayload, SheetBackend};
use amsa_core::bookkeeping::{validate_edit, LedgerDraft};
use amsa_core::report::{sorted_newest_first, LedgerTotals};
use amsa_core::{LedgerCategory, LedgerEntry, Rupiah, View};

use crate::commands::MutationResult;
use crate::error::{ApiError, ApiResult};
use crate::PosApp;

/// The cash book screen: lines newest first, totals in the footer.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashBook {
    pub entries: Vec<LedgerEntry>,
    pub totals: LedgerTotals,
}

impl<B: SheetBackend> PosApp<B> {
    pub fn cash_book(&self) -> ApiResult<CashBook> {
        self.require_view(View::Ledger)?;
        let snapshot = self.snapshot.current();
        Ok(CashBook {
            entries: sorted_newest_first(&snapshot.ledger),
            totals: LedgerTotals::compute(&snapshot.ledger),
        })
    }

    /// Owner puts money in (`Modal` debit).
    #[instrument(skip(self))]
    pub async fn add_capital(&self, amount: Rupiah, note: &str) -> ApiResult<MutationResult> {
        self.require_view(View::Ledger)?;
        let draft = LedgerDraft::capital(amount, note, Utc::now())?;
        info!(%amount, "Adding capital");
        self.mutate(Action::AddCapital, &draft).await
    }

    /// Money out for stock or running costs.
    #[instrument(skip(self))]
    pub async fn add_expense(
        &self,
        amount: Rupiah,
        category: LedgerCategory,
        note: &str,
    ) -> ApiResult<MutationResult> {
        self.require_view(View::Ledger)?;
        let draft = LedgerDraft::expense(amount, category, note, Utc::now())?;
        info!(%amount, kategori = %draft.category, "Adding expense");
        self.mutate(Action::AddExpense, &draft).await
    }

    /// Owner takes cash out (`Prive` kredit), never more than the cash on
    /// hand.
    #[instrument(skip(self))]
    pub async fn withdraw_profit(&self, amount: Rupiah, note: &str) -> ApiResult<MutationResult> {
        self.require_view(View::Ledger)?;
        let snapshot = self.snapshot.current();
        let draft = LedgerDraft::withdrawal(&snapshot.ledger, amount, note, Utc::now())?;
        info!(%amount, "Withdrawing profit");
        self.mutate(Action::WithdrawProfit, &draft).await
    }

    /// Corrects an existing line.
    ///
    /// An edit that leaves the line as `Prive` goes through the same cash
    /// check as a fresh withdrawal.
    #[instrument(skip(self, entry), fields(id = %entry.id))]
    pub async fn update_ledger_entry(&self, entry: LedgerEntry) -> ApiResult<MutationResult> {
        self.require_view(View::Ledger)?;
        self.find_ledger_entry(&entry.id)?;
        validate_edit(&self.snapshot.current().ledger, &entry)?;
        self.mutate(Action::UpdateLedger, &entry).await
    }

    #[instrument(skip(self))]
    pub async fn delete_ledger_entry(&self, id: &str) -> ApiResult<MutationResult> {
        self.require_view(View::Ledger)?;
        self.find_ledger_entry(id)?;
        self.mutate(Action::DeleteLedger, &IdPayload::new(id)).await
    }

    fn find_ledger_entry(&self, id: &str) -> ApiResult<LedgerEntry> {
        self.snapshot
            .current()
            .ledger_entry(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Ledger entry", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::{ConfigState, SessionState};
    use crate::test_support::app_as;
    use amsa_client::MemoryBackend;
    use amsa_core::report::cash_balance;
    use amsa_core::{User, UserRole};

    async fn app_with_cash(amount: i64) -> PosApp<MemoryBackend> {
        let opening = LedgerEntry::debit(
            "1",
            "2024-05-01T08:00:00.000Z",
            "Modal Awal",
            Rupiah::new(amount),
            LedgerCategory::Capital,
        );
        let app = PosApp::new(
            MemoryBackend::with_data(Vec::new(), vec![opening]),
            ConfigState::default(),
            SessionState::new(),
        );
        app.session
            .set(User::new("Admin", UserRole::Admin))
            .unwrap();
        app.refresh().await;
        app
    }

    #[tokio::test]
    async fn test_withdrawal_over_cash_rejected_before_submit() {
        let app = app_with_cash(500_000).await;

        let err = app
            .withdraw_profit(Rupiah::new(600_000), "")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientCash);
        assert_eq!(app.snapshot().version(), 1);
        assert_eq!(app.cash_book().unwrap().entries.len(), 1);
    }

    #[tokio::test]
    async fn test_withdrawal_of_all_cash_records_prive() {
        let app = app_with_cash(500_000).await;

        let result = app.withdraw_profit(Rupiah::new(500_000), "").await.unwrap();
        assert!(result.refresh.is_fresh());

        let ledger = app.snapshot().current().ledger.clone();
        let prive = ledger
            .iter()
            .find(|e| e.category == LedgerCategory::OwnerWithdrawal)
            .unwrap();
        assert_eq!(prive.credit, Rupiah::new(500_000));
        assert_eq!(prive.debit, Rupiah::zero());
        assert_eq!(prive.description, "Penarikan Prive");
        assert_eq!(cash_balance(&ledger), Rupiah::zero());
    }

    #[tokio::test]
    async fn test_capital_and_expense() {
        let app = app_as(UserRole::Admin).await;
        app.add_capital(Rupiah::new(1_000_000), "").await.unwrap();
        app.add_expense(
            Rupiah::new(150_000),
            LedgerCategory::parse("Listrik"),
            "Token listrik",
        )
        .await
        .unwrap();

        let book = app.cash_book().unwrap();
        assert_eq!(book.entries.len(), 4);
        assert_eq!(book.totals.total_debit, Rupiah::new(6_000_000));
        assert_eq!(book.totals.total_credit, Rupiah::new(1_650_000));
        assert_eq!(book.totals.balance, Rupiah::new(4_350_000));
    }

    #[tokio::test]
    async fn test_sales_category_is_not_an_expense() {
        let app = app_as(UserRole::Admin).await;
        let err = app
            .add_expense(Rupiah::new(1000), LedgerCategory::Sales, "salah")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_edit_and_delete_lines() {
        let app = app_as(UserRole::Admin).await;
        let mut opening = app.snapshot().current().ledger[0].clone();
        opening.debit = Rupiah::new(6_000_000);
        app.update_ledger_entry(opening).await.unwrap();
        assert_eq!(app.cash_book().unwrap().totals.balance, Rupiah::new(4_500_000));

        app.delete_ledger_entry("2").await.unwrap();
        assert_eq!(app.cash_book().unwrap().totals.balance, Rupiah::new(6_000_000));

        let err = app.delete_ledger_entry("2").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_edit_cannot_withdraw_more_than_cash() {
        let app = app_as(UserRole::Admin).await;
        let cash = app.cash_book().unwrap().totals.balance;

        let mut line = app.snapshot().current().ledger[1].clone();
        line.debit = Rupiah::zero();
        line.credit = cash + Rupiah::new(10_000_000);
        line.category = LedgerCategory::OwnerWithdrawal;

        let err = app.update_ledger_entry(line.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientCash);
        assert_eq!(app.snapshot().version(), 1);
        assert_eq!(app.cash_book().unwrap().totals.balance, cash);

        // Line "2" (Belanja Stok 1.500.000) may become a Prive of up to the
        // 5.000.000 the opening capital holds.
        line.credit = Rupiah::new(5_000_000);
        app.update_ledger_entry(line).await.unwrap();
        assert_eq!(app.cash_book().unwrap().totals.balance, Rupiah::zero());
    }

    #[tokio::test]
    async fn test_kasir_cannot_see_cash_book() {
        let app = app_as(UserRole::Kasir).await;
        assert_eq!(app.cash_book().unwrap_err().code, ErrorCode::Forbidden);
    }
}
