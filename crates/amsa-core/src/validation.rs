//! # Validation Module
//!
//! Input validation utilities for Amsa Mart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form input                                                   │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: POS command (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Spreadsheet endpoint                                         │
//! │  └── Whatever the script checks (not much)                             │
//! │                                                                         │
//! │  The sheet accepts nearly anything, so this layer is the real gate.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use amsa_core::validation::{validate_code, validate_quantity};
//!
//! validate_code("BRG001").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Rupiah;
use crate::report::Period;
use crate::types::Product;
use crate::MAX_CART_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product code.
pub const MAX_CODE_LEN: usize = 50;
/// Longest accepted product name or ledger description.
pub const MAX_TEXT_LEN: usize = 200;
/// Longest accepted category label.
pub const MAX_CATEGORY_LEN: usize = 50;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code (`kode`).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens, underscores and dots only
///
/// ## Example
/// ```rust
/// use amsa_core::validation::validate_code;
///
/// assert!(validate_code("BRG001").is_ok());
/// assert!(validate_code("").is_err());
/// assert!(validate_code("BRG 001").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "kode".to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "kode".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ValidationError::InvalidFormat {
            field: "kode".to_string(),
            reason: "must contain only letters, numbers, hyphens, underscores, and dots"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a product name (`nama`).
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("nama", name, MAX_TEXT_LEN)
}

/// Validates a category label (product or ledger).
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_text("kategori", category, MAX_CATEGORY_LEN)
}

/// Validates a ledger description (`deskripsi`).
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_text("deskripsi", description, MAX_TEXT_LEN)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a `YYYY-MM` report period and parses it.
pub fn validate_period(period: &str) -> ValidationResult<Period> {
    period.trim().parse()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity (cart line or restock).
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stok".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (giveaway items)
///
/// ## Example
/// ```rust
/// use amsa_core::money::Rupiah;
/// use amsa_core::validation::validate_price;
///
/// assert!(validate_price("harga_jual", Rupiah::new(3500)).is_ok());
/// assert!(validate_price("harga_jual", Rupiah::zero()).is_ok());
/// assert!(validate_price("harga_jual", Rupiah::new(-1)).is_err());
/// ```
pub fn validate_price(field: &str, price: Rupiah) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a cash amount for a ledger line (capital, expense, withdrawal).
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_amount(amount: Rupiah) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "jumlah".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a product form before ADD_PRODUCT / UPDATE_PRODUCT.
///
/// ```text
/// kode ──► validate_code
/// nama ──► validate_product_name
/// kategori ──► validate_category
/// harga_beli, harga_jual ──► validate_price
/// stok ──► validate_stock
/// ```
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_code(&product.code)?;
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_price("harga_beli", product.cost_price)?;
    validate_price("harga_jual", product.sale_price)?;
    validate_stock(product.stock)?;
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct products).
///
/// ## Rules
/// - Must stay below MAX_CART_ITEMS (100) before adding another line
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert!(validate_code("BRG001").is_ok());
        assert!(validate_code("ATK-01").is_ok());
        assert!(validate_code("v1.2").is_ok());

        assert!(validate_code("").is_err());
        assert!(validate_code("   ").is_err());
        assert!(validate_code("BRG 001").is_err());
        assert!(validate_code(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_text_fields() {
        assert!(validate_product_name("Telur Ayam (kg)").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());

        assert!(validate_category("Sembako").is_ok());
        assert!(validate_category(" ").is_err());

        assert!(validate_description("Bayar listrik").is_ok());
        assert!(matches!(
            validate_description(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  kopi ").unwrap(), "kopi");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());

        assert!(validate_amount(Rupiah::new(1)).is_ok());
        assert!(validate_amount(Rupiah::zero()).is_err());
        assert!(validate_amount(Rupiah::new(-500)).is_err());
    }

    #[test]
    fn test_validate_period() {
        assert_eq!(validate_period(" 2024-05 ").unwrap().to_string(), "2024-05");
        assert!(validate_period("2024-13").is_err());
        assert!(validate_period("Mei 2024").is_err());
    }

    #[test]
    fn test_validate_product() {
        let product = Product::new("", "BRG006", "Gula Pasir 1kg", 14_000, 16_500, 20);
        assert!(validate_product(&product).is_ok());

        let mut bad = product.clone();
        bad.sale_price = Rupiah::new(-1);
        assert!(matches!(
            validate_product(&bad),
            Err(ValidationError::MustNotBeNegative { .. })
        ));

        let mut bad = product;
        bad.code = String::new();
        assert!(validate_product(&bad).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }
}
