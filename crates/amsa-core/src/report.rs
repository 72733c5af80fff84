//! # Report Engine
//!
//! Derives every financial figure the shop looks at from two snapshots:
//! the cash book and the inventory.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Report Computation                               │
//! │                                                                         │
//! │   ledger: &[LedgerEntry]          inventory: &[Product]                │
//! │          │                                │                             │
//! │          ├──► cash_balance ──────┐        ├──► stock_asset_value       │
//! │          ├──► total_capital ─────┤        └──► potential_revenue       │
//! │          ├──► total_withdrawals ─┤                    │                 │
//! │          │                       ▼                    ▼                 │
//! │          │                 NetWorthProfit ◄───────────┘                 │
//! │          │                                                              │
//! │          └──► filter_period(YYYY-MM) ──► MonthlyCashFlow               │
//! │                                                                         │
//! │   Everything is recomputed on each call. No cached state lives here.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Formulas
//! ```text
//! saldoKas        = Σ debit − Σ kredit                      (all time)
//! nilaiAsetStok   = Σ harga_beli × stok
//! totalModal      = Σ debit  where kategori = Modal
//! totalPrive      = Σ kredit where kategori = Prive
//! labaBersih      = (saldoKas + nilaiAsetStok + totalPrive) − totalModal
//!
//! surplus(month)  = Σ debit(Penjualan)
//!                 − Σ kredit(Belanja Stok)
//!                 − Σ kredit(kategori ∉ {Belanja Stok, Prive})
//! ```
//!
//! A fetch failure upstream simply hands this module an older (or empty)
//! snapshot. The engine cannot tell "no transactions yet" from "could not
//! load", and does not try to.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::category::LedgerCategory;
use crate::error::ValidationError;
use crate::money::Rupiah;
use crate::types::{LedgerEntry, Product};

// =============================================================================
// Period
// =============================================================================

/// A calendar month, written `YYYY-MM`.
///
/// Ledger lines belong to a period when their `tanggal` string starts with
/// the period text. No timezone conversion happens: the sheet stores UTC
/// ISO strings and the match is on those characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, checking the month number.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "month".to_string(),
                min: 1,
                max: 12,
            });
        }
        if !(0..=9999).contains(&year) {
            return Err(ValidationError::OutOfRange {
                field: "year".to_string(),
                min: 0,
                max: 9999,
            });
        }
        Ok(Period { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month on the local clock.
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The `YYYY-MM` prefix matched against `tanggal`.
    pub fn prefix(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// True when the entry's date string starts with this period.
    pub fn contains(&self, entry: &LedgerEntry) -> bool {
        entry.date.starts_with(&self.prefix())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "period".to_string(),
            reason: format!("expected YYYY-MM, got '{}'", s),
        };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Period::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

// =============================================================================
// Scans
// =============================================================================

/// Entries whose `tanggal` falls in the given month.
pub fn filter_period<'a, I>(ledger: I, period: &Period) -> Vec<&'a LedgerEntry>
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let prefix = period.prefix();
    ledger
        .into_iter()
        .filter(|entry| entry.date.starts_with(&prefix))
        .collect()
}

/// `saldoKas`: Σ debit − Σ kredit over every entry given.
pub fn cash_balance<'a, I>(ledger: I) -> Rupiah
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    ledger.into_iter().map(LedgerEntry::net).sum()
}

/// `nilaiAsetStok`: stock valued at cost.
pub fn stock_asset_value<'a, I>(inventory: I) -> Rupiah
where
    I: IntoIterator<Item = &'a Product>,
{
    inventory.into_iter().map(Product::asset_value).sum()
}

/// `potensiOmset`: stock valued at sale price.
pub fn potential_revenue<'a, I>(inventory: I) -> Rupiah
where
    I: IntoIterator<Item = &'a Product>,
{
    inventory.into_iter().map(Product::potential_revenue).sum()
}

/// `totalModal`: Σ debit of `Modal` lines.
pub fn total_capital<'a, I>(ledger: I) -> Rupiah
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    ledger
        .into_iter()
        .filter(|e| e.category == LedgerCategory::Capital)
        .map(|e| e.debit)
        .sum()
}

/// `totalPrive`: Σ kredit of `Prive` lines.
pub fn total_withdrawals<'a, I>(ledger: I) -> Rupiah
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    ledger
        .into_iter()
        .filter(|e| e.category == LedgerCategory::OwnerWithdrawal)
        .map(|e| e.credit)
        .sum()
}

/// Cash book listing order: newest `tanggal` first.
///
/// Lines with an unreadable date sink to the bottom; ties keep their
/// original order.
pub fn sorted_newest_first(ledger: &[LedgerEntry]) -> Vec<LedgerEntry> {
    let mut sorted = ledger.to_vec();
    sorted.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp()));
    sorted
}

// =============================================================================
// Ledger Totals
// =============================================================================

/// Footer of the cash book view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerTotals {
    pub total_debit: Rupiah,
    pub total_credit: Rupiah,
    pub balance: Rupiah,
}

impl LedgerTotals {
    pub fn compute<'a, I>(ledger: I) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut totals = LedgerTotals::default();
        for entry in ledger {
            totals.total_debit += entry.debit;
            totals.total_credit += entry.credit;
        }
        totals.balance = totals.total_debit - totals.total_credit;
        totals
    }
}

// =============================================================================
// Cash Flow
// =============================================================================

/// Revenue against outflows for a set of entries (usually one month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyCashFlow {
    /// Σ debit of `Penjualan`.
    pub revenue: Rupiah,
    /// Σ kredit of `Belanja Stok`.
    pub stock_purchases: Rupiah,
    /// Σ kredit of everything except `Belanja Stok` and `Prive`.
    pub operating_expenses: Rupiah,
    pub surplus: Rupiah,
}

impl MonthlyCashFlow {
    /// Cash flow over the given entries, without any period filter.
    pub fn over<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut flow = MonthlyCashFlow::default();
        for entry in entries {
            match entry.category {
                LedgerCategory::Sales => flow.revenue += entry.debit,
                LedgerCategory::StockPurchase => flow.stock_purchases += entry.credit,
                _ => {}
            }
            if entry.credit.is_positive() && entry.category.counts_as_operating_expense() {
                flow.operating_expenses += entry.credit;
            }
        }
        flow.surplus = flow.revenue - flow.stock_purchases - flow.operating_expenses;
        flow
    }

    /// Cash flow for one calendar month.
    pub fn for_period(ledger: &[LedgerEntry], period: &Period) -> Self {
        Self::over(filter_period(ledger, period))
    }
}

// =============================================================================
// Net Worth
// =============================================================================

/// Net profit by the net-worth method, with its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NetWorthProfit {
    pub cash: Rupiah,
    pub stock_value: Rupiah,
    pub withdrawals: Rupiah,
    pub capital: Rupiah,
    pub profit: Rupiah,
}

impl NetWorthProfit {
    /// ## Example
    /// ```rust
    /// use amsa_core::report::NetWorthProfit;
    /// use amsa_core::{LedgerCategory, LedgerEntry, Rupiah};
    ///
    /// let ledger = vec![
    ///     LedgerEntry::debit("1", "2024-05-01", "Modal", Rupiah::new(1_000), LedgerCategory::Capital),
    ///     LedgerEntry::debit("2", "2024-05-02", "Jual", Rupiah::new(300), LedgerCategory::Sales),
    /// ];
    /// let nw = NetWorthProfit::compute(&ledger, &[]);
    /// assert_eq!(nw.profit, Rupiah::new(300));
    /// ```
    pub fn compute(ledger: &[LedgerEntry], inventory: &[Product]) -> Self {
        let cash = cash_balance(ledger);
        let stock_value = stock_asset_value(inventory);
        let withdrawals = total_withdrawals(ledger);
        let capital = total_capital(ledger);
        NetWorthProfit {
            cash,
            stock_value,
            withdrawals,
            capital,
            profit: cash + stock_value + withdrawals - capital,
        }
    }
}

// =============================================================================
// Asset Composition
// =============================================================================

/// The two slices of the asset chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssetComposition {
    /// Cash on hand, never below zero.
    pub cash: Rupiah,
    pub stock: Rupiah,
    pub total: Rupiah,
}

impl AssetComposition {
    pub fn new(cash: Rupiah, stock: Rupiah) -> Self {
        let cash = cash.clamp_non_negative();
        AssetComposition {
            cash,
            stock,
            total: cash + stock,
        }
    }
}

// =============================================================================
// Profit Method
// =============================================================================

/// Which formula the headline "Laba Bersih" figure uses.
///
/// ```text
/// method                    formula (all time)
/// ──────────────────────    ─────────────────────────────────────────────
/// net_worth (default)       saldoKas + nilaiAsetStok + totalPrive − totalModal
/// cash_flow                 Σ Penjualan − Σ Belanja Stok − Σ operating
/// cash_flow_plus_drawings   saldoKas + totalPrive − totalModal
/// cash_flow_plus_stock      saldoKas + nilaiAsetStok − totalModal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProfitMethod {
    #[default]
    NetWorth,
    CashFlow,
    CashFlowPlusDrawings,
    CashFlowPlusStock,
}

impl ProfitMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfitMethod::NetWorth => "net_worth",
            ProfitMethod::CashFlow => "cash_flow",
            ProfitMethod::CashFlowPlusDrawings => "cash_flow_plus_drawings",
            ProfitMethod::CashFlowPlusStock => "cash_flow_plus_stock",
        }
    }
}

impl fmt::Display for ProfitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfitMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "net_worth" => Ok(ProfitMethod::NetWorth),
            "cash_flow" => Ok(ProfitMethod::CashFlow),
            "cash_flow_plus_drawings" => Ok(ProfitMethod::CashFlowPlusDrawings),
            "cash_flow_plus_stock" => Ok(ProfitMethod::CashFlowPlusStock),
            other => Err(ValidationError::InvalidFormat {
                field: "profit_method".to_string(),
                reason: format!(
                    "unknown method '{}'; expected net_worth, cash_flow, \
                     cash_flow_plus_drawings or cash_flow_plus_stock",
                    other
                ),
            }),
        }
    }
}

/// All-time profit by the chosen formula.
pub fn profit_by(method: ProfitMethod, ledger: &[LedgerEntry], inventory: &[Product]) -> Rupiah {
    match method {
        ProfitMethod::NetWorth => NetWorthProfit::compute(ledger, inventory).profit,
        ProfitMethod::CashFlow => MonthlyCashFlow::over(ledger).surplus,
        ProfitMethod::CashFlowPlusDrawings => {
            cash_balance(ledger) + total_withdrawals(ledger) - total_capital(ledger)
        }
        ProfitMethod::CashFlowPlusStock => {
            cash_balance(ledger) + stock_asset_value(inventory) - total_capital(ledger)
        }
    }
}

// =============================================================================
// Financial Report
// =============================================================================

/// Everything the reports screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinancialReport {
    #[ts(as = "String")]
    pub period: Period,
    pub method: ProfitMethod,
    pub cash_balance: Rupiah,
    pub stock_value: Rupiah,
    pub potential_revenue: Rupiah,
    pub net_worth: NetWorthProfit,
    /// Headline profit by `method`.
    pub profit: Rupiah,
    pub monthly: MonthlyCashFlow,
    pub assets: AssetComposition,
}

impl FinancialReport {
    /// Builds the report from snapshots. Same input, same output.
    pub fn compute(
        ledger: &[LedgerEntry],
        inventory: &[Product],
        period: &Period,
        method: ProfitMethod,
    ) -> Self {
        let net_worth = NetWorthProfit::compute(ledger, inventory);
        FinancialReport {
            period: *period,
            method,
            cash_balance: net_worth.cash,
            stock_value: net_worth.stock_value,
            potential_revenue: potential_revenue(inventory),
            net_worth,
            profit: profit_by(method, ledger, inventory),
            monthly: MonthlyCashFlow::for_period(ledger, period),
            assets: AssetComposition::new(net_worth.cash, net_worth.stock_value),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
