//! # amsa-core: Pure Business Logic for Amsa Mart
//!
//! This crate holds the bookkeeping and reporting rules of the shop as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Amsa Mart Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/pos (state + commands)                  │   │
//! │  │    login, cart, checkout, restock, cash book, reports          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ amsa-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │ category │ │  report  │ │   bookkeeping    │  │   │
//! │  │   │ Product  │ │ Modal    │ │ saldoKas │ │ capital/expense  │  │   │
//! │  │   │ Ledger   │ │ Prive .. │ │ laba ..  │ │ withdrawal rules │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │   cart   │ │ checkout │ │    validation    │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             amsa-client (spreadsheet endpoint)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LedgerEntry, User, etc.)
//! - [`money`] - Rupiah type with integer arithmetic
//! - [`category`] - Ledger category classification
//! - [`report`] - Aggregation engine (cash, stock value, profit, cash flow)
//! - [`bookkeeping`] - Capital, expense and withdrawal entry contracts
//! - [`cart`] - Shopping cart math
//! - [`checkout`] - Checkout and restock payloads
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use amsa_core::report::{cash_balance, stock_asset_value};
//! use amsa_core::{LedgerCategory, LedgerEntry, Product, Rupiah};
//!
//! let ledger = vec![
//!     LedgerEntry::debit("1", "2024-05-01T08:00:00Z", "Modal Awal", Rupiah::new(5_000_000), LedgerCategory::Capital),
//!     LedgerEntry::credit("2", "2024-05-01T09:00:00Z", "Belanja", Rupiah::new(1_500_000), LedgerCategory::StockPurchase),
//! ];
//! assert_eq!(cash_balance(&ledger), Rupiah::new(3_500_000));
//!
//! let inventory = vec![Product::new("1", "BRG001", "Indomie Goreng", 2500, 3500, 100)];
//! assert_eq!(stock_asset_value(&inventory), Rupiah::new(250_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bookkeeping;
pub mod cart;
pub mod category;
pub mod checkout;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use category::{AccountingRole, LedgerCategory};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Rupiah;
pub use report::{FinancialReport, Period, ProfitMethod};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a product is flagged as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum distinct products in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Category assigned to new products when the form leaves it blank.
pub const DEFAULT_PRODUCT_CATEGORY: &str = "Umum";
