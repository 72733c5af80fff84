//! # Ledger Categories
//!
//! Maps a cash-book line's `kategori` to its role in the financial
//! statements.
//!
//! ## Classification Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kategori (exact, case-sensitive)   side       AccountingRole           │
//! │  ────────────────────────────────   ────────   ───────────────────────  │
//! │  "Modal"                            any        CapitalContribution      │
//! │  "Penjualan"                        any        SalesRevenue             │
//! │  "Belanja Stok"                     any        StockPurchase            │
//! │  "Prive"                            any        OwnerWithdrawal          │
//! │  anything else                      kredit>0   OperatingExpense         │
//! │  anything else                      kredit=0   Unclassified             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The four special labels are a closed set; everything else is kept
//! verbatim in [`LedgerCategory::Other`]. A typo such as `"modal"` therefore
//! lands in `Other` and shows up as an expense or unclassified line instead
//! of silently inflating capital.
//!
//! Classification never fails.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Rupiah;
use crate::types::LedgerEntry;

// =============================================================================
// Category Labels
// =============================================================================

/// Wire label for owner capital contributions.
pub const MODAL: &str = "Modal";
/// Wire label for sales revenue.
pub const PENJUALAN: &str = "Penjualan";
/// Wire label for inventory purchases.
pub const BELANJA_STOK: &str = "Belanja Stok";
/// Wire label for owner withdrawals.
pub const PRIVE: &str = "Prive";

/// Operating expense labels offered by the expense form.
///
/// Not exhaustive: any other label with a kredit amount is an operating
/// expense too.
pub const OPERATING_EXPENSE_LABELS: &[&str] = &[
    "Gaji Karyawan",
    "Listrik & Air",
    "Sewa Tempat",
    "Transportasi",
    "Perawatan",
    "Lain-lain",
];

// =============================================================================
// LedgerCategory
// =============================================================================

/// The `kategori` column of a cash-book line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LedgerCategory {
    /// `Modal`: owner puts money into the business.
    Capital,
    /// `Penjualan`: cash from sales.
    Sales,
    /// `Belanja Stok`: cash spent on goods for resale.
    StockPurchase,
    /// `Prive`: owner takes money out.
    OwnerWithdrawal,
    /// Any other label, kept as typed.
    Other(String),
}

impl LedgerCategory {
    /// Parses a label with exact, case-sensitive matching.
    ///
    /// ## Example
    /// ```rust
    /// use amsa_core::LedgerCategory;
    ///
    /// assert_eq!(LedgerCategory::parse("Prive"), LedgerCategory::OwnerWithdrawal);
    /// assert_eq!(
    ///     LedgerCategory::parse("prive"),
    ///     LedgerCategory::Other("prive".to_string())
    /// );
    /// ```
    pub fn parse(label: &str) -> Self {
        match label {
            MODAL => LedgerCategory::Capital,
            PENJUALAN => LedgerCategory::Sales,
            BELANJA_STOK => LedgerCategory::StockPurchase,
            PRIVE => LedgerCategory::OwnerWithdrawal,
            other => LedgerCategory::Other(other.to_string()),
        }
    }

    /// Returns the label as stored in the sheet.
    pub fn as_str(&self) -> &str {
        match self {
            LedgerCategory::Capital => MODAL,
            LedgerCategory::Sales => PENJUALAN,
            LedgerCategory::StockPurchase => BELANJA_STOK,
            LedgerCategory::OwnerWithdrawal => PRIVE,
            LedgerCategory::Other(label) => label,
        }
    }

    /// True for the four labels with a fixed meaning.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, LedgerCategory::Other(_))
    }

    /// Whether a kredit line in this category counts as an operating expense.
    ///
    /// Stock purchases and owner withdrawals are outflows too, but neither is
    /// a cost of running the shop: one becomes stock, the other is profit
    /// already taken.
    pub fn counts_as_operating_expense(&self) -> bool {
        !matches!(
            self,
            LedgerCategory::StockPurchase | LedgerCategory::OwnerWithdrawal
        )
    }

    /// Accounting role for a line in this category with the given kredit.
    pub fn role_for(&self, kredit: Rupiah) -> AccountingRole {
        match self {
            LedgerCategory::Capital => AccountingRole::CapitalContribution,
            LedgerCategory::Sales => AccountingRole::SalesRevenue,
            LedgerCategory::StockPurchase => AccountingRole::StockPurchase,
            LedgerCategory::OwnerWithdrawal => AccountingRole::OwnerWithdrawal,
            LedgerCategory::Other(_) if kredit.is_positive() => AccountingRole::OperatingExpense,
            LedgerCategory::Other(_) => AccountingRole::Unclassified,
        }
    }
}

impl Default for LedgerCategory {
    fn default() -> Self {
        LedgerCategory::Other(String::new())
    }
}

impl From<String> for LedgerCategory {
    fn from(label: String) -> Self {
        match label.as_str() {
            MODAL => LedgerCategory::Capital,
            PENJUALAN => LedgerCategory::Sales,
            BELANJA_STOK => LedgerCategory::StockPurchase,
            PRIVE => LedgerCategory::OwnerWithdrawal,
            _ => LedgerCategory::Other(label),
        }
    }
}

impl From<&str> for LedgerCategory {
    fn from(label: &str) -> Self {
        LedgerCategory::parse(label)
    }
}

impl From<LedgerCategory> for String {
    fn from(category: LedgerCategory) -> Self {
        match category {
            LedgerCategory::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LedgerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// AccountingRole
// =============================================================================

/// Role of a cash-book line in the profit/loss and asset reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountingRole {
    CapitalContribution,
    SalesRevenue,
    StockPurchase,
    OwnerWithdrawal,
    OperatingExpense,
    /// Unrecognized label on the debit side (e.g. a misc. inflow).
    Unclassified,
}

/// Classifies a single ledger entry.
pub fn classify(entry: &LedgerEntry) -> AccountingRole {
    entry.category.role_for(entry.credit)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_labels() {
        assert_eq!(LedgerCategory::parse("Modal"), LedgerCategory::Capital);
        assert_eq!(LedgerCategory::parse("Penjualan"), LedgerCategory::Sales);
        assert_eq!(
            LedgerCategory::parse("Belanja Stok"),
            LedgerCategory::StockPurchase
        );
        assert_eq!(
            LedgerCategory::parse("Prive"),
            LedgerCategory::OwnerWithdrawal
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(!LedgerCategory::parse("modal").is_recognized());
        assert!(!LedgerCategory::parse("Belanja stok").is_recognized());
        assert!(!LedgerCategory::parse(" Prive").is_recognized());
    }

    #[test]
    fn test_label_round_trips_through_string() {
        for label in ["Modal", "Penjualan", "Belanja Stok", "Prive", "Sewa Tempat"] {
            let category = LedgerCategory::from(label);
            assert_eq!(String::from(category), label);
        }
    }

    #[test]
    fn test_serde_uses_plain_label() {
        let json = serde_json::to_string(&LedgerCategory::StockPurchase).unwrap();
        assert_eq!(json, "\"Belanja Stok\"");

        let parsed: LedgerCategory = serde_json::from_str("\"Gaji Karyawan\"").unwrap();
        assert_eq!(parsed, LedgerCategory::Other("Gaji Karyawan".to_string()));
    }

    #[test]
    fn test_roles_follow_category_not_side() {
        let refund = Rupiah::new(10_000);
        assert_eq!(
            LedgerCategory::Sales.role_for(refund),
            AccountingRole::SalesRevenue
        );
        assert_eq!(
            LedgerCategory::Capital.role_for(Rupiah::zero()),
            AccountingRole::CapitalContribution
        );
    }

    #[test]
    fn test_unrecognized_defaults_by_side() {
        let listrik = LedgerCategory::parse("Listrik & Air");
        assert_eq!(
            listrik.role_for(Rupiah::new(150_000)),
            AccountingRole::OperatingExpense
        );
        assert_eq!(listrik.role_for(Rupiah::zero()), AccountingRole::Unclassified);
    }

    #[test]
    fn test_classify_entry() {
        let gaji = LedgerEntry::credit(
            "9",
            "2024-05-31T17:00:00Z",
            "Gaji Mei",
            Rupiah::new(1_000_000),
            LedgerCategory::parse("Gaji Karyawan"),
        );
        assert_eq!(classify(&gaji), AccountingRole::OperatingExpense);
    }

    #[test]
    fn test_operating_expense_exclusions() {
        assert!(!LedgerCategory::StockPurchase.counts_as_operating_expense());
        assert!(!LedgerCategory::OwnerWithdrawal.counts_as_operating_expense());
        assert!(LedgerCategory::parse("Sewa Tempat").counts_as_operating_expense());
    }
}
