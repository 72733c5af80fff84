//! # Bookkeeping Rules
//!
//! Builds the cash-book lines the POS is allowed to write, and rejects the
//! ones it is not.
//!
//! ## Entry Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Action            debit    kredit   kategori          Guard            │
//! │  ────────────────  ───────  ───────  ────────────────  ──────────────── │
//! │  ADD_CAPITAL       amount   0        Modal             amount > 0       │
//! │  ADD_EXPENSE       0        amount   Belanja Stok /    amount > 0,      │
//! │                                      operating label   label allowed    │
//! │  WITHDRAW_PROFIT   0        amount   Prive             0 < amount       │
//! │                                                        ≤ saldoKas       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales lines are written by the remote CHECKOUT handler, never here.
//!
//! Every check runs before anything is sent. A rejected draft means the
//! sheet was not touched.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::LedgerCategory;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Rupiah;
use crate::report::cash_balance;
use crate::types::LedgerEntry;
use crate::validation::{validate_amount, validate_category, validate_description};

/// Description used when the capital form leaves the note blank.
pub const DEFAULT_CAPITAL_NOTE: &str = "Tambah Modal";
/// Description used when the withdrawal form leaves the note blank.
pub const DEFAULT_WITHDRAWAL_NOTE: &str = "Penarikan Prive";

// =============================================================================
// Ledger Draft
// =============================================================================

/// A cash-book line that has not been written yet (no id).
///
/// Serializes to the payload of ADD_CAPITAL, ADD_EXPENSE and
/// WITHDRAW_PROFIT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerDraft {
    #[serde(rename = "tanggal")]
    pub date: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    pub debit: Rupiah,
    #[serde(rename = "kredit")]
    pub credit: Rupiah,
    #[serde(rename = "kategori")]
    #[ts(as = "String")]
    pub category: LedgerCategory,
}

impl LedgerDraft {
    /// Owner puts money in.
    pub fn capital(amount: Rupiah, note: &str, now: DateTime<Utc>) -> CoreResult<Self> {
        validate_amount(amount)?;
        Ok(LedgerDraft {
            date: iso_timestamp(now),
            description: note_or(note, DEFAULT_CAPITAL_NOTE),
            debit: amount,
            credit: Rupiah::zero(),
            category: LedgerCategory::Capital,
        })
    }

    /// Money goes out for stock or running costs.
    ///
    /// `Modal`, `Penjualan` and `Prive` are refused: the first two are
    /// inflows, and withdrawals must go through [`LedgerDraft::withdrawal`]
    /// so the cash check runs.
    pub fn expense(
        amount: Rupiah,
        category: LedgerCategory,
        note: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_amount(amount)?;
        validate_description(note)?;
        match &category {
            LedgerCategory::Capital | LedgerCategory::Sales | LedgerCategory::OwnerWithdrawal => {
                return Err(CoreError::NotAnExpenseCategory(category.to_string()));
            }
            LedgerCategory::Other(label) => validate_category(label)?,
            LedgerCategory::StockPurchase => {}
        }

        Ok(LedgerDraft {
            date: iso_timestamp(now),
            description: note.trim().to_string(),
            debit: Rupiah::zero(),
            credit: amount,
            category,
        })
    }

    /// Owner takes profit out as cash.
    ///
    /// ## User Workflow
    /// ```text
    /// saldoKas = Rp 500.000
    ///      │
    ///      ├── withdraw Rp 600.000 ──► InsufficientCash, nothing sent
    ///      │
    ///      └── withdraw Rp 500.000 ──► { kredit: 500000, kategori: "Prive" }
    ///                                        │
    ///                                        ▼
    ///                            WITHDRAW_PROFIT, then refetch
    /// ```
    pub fn withdrawal(
        ledger: &[LedgerEntry],
        amount: Rupiah,
        note: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_withdrawal(amount, cash_balance(ledger))?;
        Ok(LedgerDraft {
            date: iso_timestamp(now),
            description: note_or(note, DEFAULT_WITHDRAWAL_NOTE),
            debit: Rupiah::zero(),
            credit: amount,
            category: LedgerCategory::OwnerWithdrawal,
        })
    }

    /// Attaches an id, as the sheet will once the line is stored.
    pub fn into_entry(self, id: impl Into<String>) -> LedgerEntry {
        LedgerEntry {
            id: id.into(),
            date: self.date,
            description: self.description,
            debit: self.debit,
            credit: self.credit,
            category: self.category,
        }
    }
}

// =============================================================================
// Guards
// =============================================================================

/// Rejects a withdrawal that is not positive or exceeds the cash on hand.
///
/// Profit by the net-worth method may be larger than the cash balance; the
/// difference sits on the shelf and cannot be taken out.
pub fn validate_withdrawal(amount: Rupiah, cash: Rupiah) -> CoreResult<()> {
    validate_amount(amount)?;
    if amount > cash {
        return Err(CoreError::InsufficientCash {
            requested: amount,
            available: cash,
        });
    }
    Ok(())
}

/// Checks an edited cash-book line before UPDATE_LEDGER.
pub fn validate_entry(entry: &LedgerEntry) -> CoreResult<()> {
    if entry.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        }
        .into());
    }
    validate_description(&entry.description)?;
    validate_category(entry.category.as_str())?;

    if entry.debit.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "debit".to_string(),
        }
        .into());
    }
    if entry.credit.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "kredit".to_string(),
        }
        .into());
    }
    if entry.debit.is_zero() && entry.credit.is_zero() {
        return Err(ValidationError::MustBePositive {
            field: "debit/kredit".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Checks an edit of `edited.id` against the rest of `ledger`.
///
/// A line that ends up as `Prive` is a withdrawal and may not take more
/// than the cash the other lines leave.
pub fn validate_edit(ledger: &[LedgerEntry], edited: &LedgerEntry) -> CoreResult<()> {
    validate_entry(edited)?;
    if edited.category == LedgerCategory::OwnerWithdrawal {
        let others = ledger.iter().filter(|e| e.id != edited.id);
        validate_withdrawal(edited.credit, cash_balance(others))?;
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// `2024-05-01T08:00:00.000Z`, the format the sheet already holds.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn note_or(note: &str, fallback: &str) -> String {
    let note = note.trim();
    if note.is_empty() {
        fallback.to_string()
    } else {
        note.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 8, 30, 0).unwrap()
    }

    fn cash_of(amount: i64) -> Vec<LedgerEntry> {
        vec![LedgerEntry::debit(
            "1",
            "2024-05-01T08:00:00.000Z",
            "Modal Awal",
            Rupiah::new(amount),
            LedgerCategory::Capital,
        )]
    }

    #[test]
    fn test_capital_draft() {
        let draft = LedgerDraft::capital(Rupiah::new(1_000_000), "  ", now()).unwrap();
        assert_eq!(draft.debit, Rupiah::new(1_000_000));
        assert!(draft.credit.is_zero());
        assert_eq!(draft.category, LedgerCategory::Capital);
        assert_eq!(draft.description, DEFAULT_CAPITAL_NOTE);
        assert_eq!(draft.date, "2024-05-20T08:30:00.000Z");

        assert!(LedgerDraft::capital(Rupiah::zero(), "x", now()).is_err());
    }

    #[test]
    fn test_expense_draft() {
        let draft = LedgerDraft::expense(
            Rupiah::new(150_000),
            LedgerCategory::parse("Listrik & Air"),
            "Token listrik Mei",
            now(),
        )
        .unwrap();
        assert_eq!(draft.credit, Rupiah::new(150_000));
        assert!(draft.debit.is_zero());

        let stock =
            LedgerDraft::expense(Rupiah::new(90_000), LedgerCategory::StockPurchase, "Kulakan", now());
        assert!(stock.is_ok());
    }

    #[test]
    fn test_expense_rejects_inflow_and_prive() {
        for category in [
            LedgerCategory::Capital,
            LedgerCategory::Sales,
            LedgerCategory::OwnerWithdrawal,
        ] {
            let result = LedgerDraft::expense(Rupiah::new(1), category, "x", now());
            assert!(matches!(result, Err(CoreError::NotAnExpenseCategory(_))));
        }

        let blank = LedgerDraft::expense(Rupiah::new(1), LedgerCategory::parse(""), "x", now());
        assert!(matches!(blank, Err(CoreError::Validation(_))));

        let no_note =
            LedgerDraft::expense(Rupiah::new(1), LedgerCategory::parse("Transportasi"), "", now());
        assert!(no_note.is_err());
    }

    #[test]
    fn test_withdrawal_over_cash_is_rejected() {
        let ledger = cash_of(500_000);
        let result = LedgerDraft::withdrawal(&ledger, Rupiah::new(600_000), "", now());

        match result {
            Err(CoreError::InsufficientCash {
                requested,
                available,
            }) => {
                assert_eq!(requested, Rupiah::new(600_000));
                assert_eq!(available, Rupiah::new(500_000));
            }
            other => panic!("expected InsufficientCash, got {:?}", other),
        }
    }

    #[test]
    fn test_withdrawal_of_all_cash_is_accepted() {
        let ledger = cash_of(500_000);
        let draft = LedgerDraft::withdrawal(&ledger, Rupiah::new(500_000), "", now()).unwrap();

        assert_eq!(draft.category, LedgerCategory::OwnerWithdrawal);
        assert_eq!(draft.credit, Rupiah::new(500_000));
        assert!(draft.debit.is_zero());
        assert_eq!(draft.description, DEFAULT_WITHDRAWAL_NOTE);

        let mut after = ledger;
        after.push(draft.into_entry("2"));
        assert_eq!(cash_balance(&after), Rupiah::zero());
    }

    #[test]
    fn test_withdrawal_must_be_positive() {
        assert!(matches!(
            validate_withdrawal(Rupiah::zero(), Rupiah::new(100)),
            Err(CoreError::Validation(_))
        ));
        assert!(validate_withdrawal(Rupiah::new(100), Rupiah::new(100)).is_ok());
    }

    #[test]
    fn test_draft_payload_uses_sheet_names() {
        let draft = LedgerDraft::withdrawal(&cash_of(500_000), Rupiah::new(500_000), "Ambil", now())
            .unwrap();
        let value = serde_json::to_value(&draft).unwrap();

        assert_eq!(value["kategori"], "Prive");
        assert_eq!(value["kredit"], 500_000);
        assert_eq!(value["debit"], 0);
        assert_eq!(value["deskripsi"], "Ambil");
        assert_eq!(value["tanggal"], "2024-05-20T08:30:00.000Z");
    }

    #[test]
    fn test_validate_entry() {
        let mut entry = LedgerDraft::capital(Rupiah::new(10), "Modal", now())
            .unwrap()
            .into_entry("7");
        assert!(validate_entry(&entry).is_ok());

        entry.debit = Rupiah::zero();
        assert!(validate_entry(&entry).is_err());

        entry.credit = Rupiah::new(-5);
        assert!(validate_entry(&entry).is_err());

        entry.credit = Rupiah::new(5);
        entry.id = String::new();
        assert!(validate_entry(&entry).is_err());
    }

    #[test]
    fn test_edit_into_prive_is_capped_by_other_lines() {
        let mut ledger = cash_of(500_000);
        ledger.push(
            LedgerDraft::withdrawal(&ledger, Rupiah::new(100_000), "", now())
                .unwrap()
                .into_entry("2"),
        );

        // Raising the withdrawal to everything the capital line holds.
        let mut edited = ledger[1].clone();
        edited.credit = Rupiah::new(500_000);
        assert!(validate_edit(&ledger, &edited).is_ok());

        edited.credit = Rupiah::new(500_001);
        assert!(matches!(
            validate_edit(&ledger, &edited),
            Err(CoreError::InsufficientCash { .. })
        ));

        // Turning the capital line itself into Prive leaves no cash to take.
        let mut capital = ledger[0].clone();
        capital.debit = Rupiah::zero();
        capital.credit = Rupiah::new(1);
        capital.category = LedgerCategory::OwnerWithdrawal;
        assert!(validate_edit(&ledger, &capital).is_err());

        // Other categories are not cash-checked.
        let mut expense = ledger[1].clone();
        expense.category = LedgerCategory::parse("Listrik");
        expense.credit = Rupiah::new(900_000);
        assert!(validate_edit(&ledger, &expense).is_ok());
    }
}
