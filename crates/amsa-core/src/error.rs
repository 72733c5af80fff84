//! # Error Types
//!
//! Domain-specific error types for amsa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  amsa-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  amsa-client errors (separate crate)                                   │
//! │  └── ClientError      - Network / config / session failures            │
//! │                                                                         │
//! │  apps/pos errors                                                       │
//! │  └── ApiError         - What the user sees (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                         ClientError ─┴──► ApiError → User notification │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unrecognized ledger categories are NOT errors; they fall back to a
//! default accounting role (see [`crate::category`]).

use thiserror::Error;

use crate::money::Rupiah;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is raised before anything is sent to the remote sheet, so a
/// `CoreError` always means "nothing was mutated".
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the current inventory snapshot.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product has no stock left.
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// Requested quantity is larger than what is on the shelf.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Indomie Goreng" (stok: 3) four times
    ///      │
    ///      ▼
    /// 4th click: qty would be 4 > stok 3
    ///      │
    ///      ▼
    /// InsufficientStock { code: "BRG001", available: 3, requested: 4 }
    ///      │
    ///      ▼
    /// Cart stays at 3
    /// ```
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    /// Cart has exceeded maximum allowed distinct items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Checkout attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Payment does not cover the total or is otherwise unusable.
    #[error("Invalid payment: {reason}")]
    InvalidPayment { reason: String },

    /// Withdrawal larger than the cash on hand.
    ///
    /// Net-worth profit may be higher than the cash balance because part of
    /// it sits on the shelf as stock; only cash can be taken out.
    #[error("Cannot withdraw {requested}: only {available} cash on hand")]
    InsufficientCash {
        requested: Rupiah,
        available: Rupiah,
    },

    /// Expense recorded under a category that is not an outflow.
    #[error("'{0}' cannot be recorded as an expense")]
    NotAnExpenseCategory(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid period, invalid URL).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            code: "BRG001".to_string(),
            available: 3,
            requested: 4,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for BRG001: available 3, requested 4"
        );
    }

    #[test]
    fn test_insufficient_cash_message_uses_rupiah_format() {
        let err = CoreError::InsufficientCash {
            requested: Rupiah::new(600_000),
            available: Rupiah::new(500_000),
        };
        assert_eq!(
            err.to_string(),
            "Cannot withdraw Rp 600.000: only Rp 500.000 cash on hand"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "kode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
