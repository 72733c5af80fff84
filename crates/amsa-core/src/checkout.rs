//! # Checkout & Restock Payloads
//!
//! Turns a cart (or a restock form) into the body of a single POST.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Cart ──► CheckoutRequest::from_cart(cart, tender)                     │
//! │              │                                                          │
//! │              ├── empty cart?              → EmptyCart                   │
//! │              ├── cash < total?            → InvalidPayment              │
//! │              └── OK → { items, total, metode, dibayar, kembalian }      │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                       POST CHECKOUT                                     │
//! │                              │                                          │
//! │                              ▼                                          │
//! │     remote: stok −= qty per item, ledger += Penjualan debit            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Restock is the mirror image: stok += qty and a Belanja Stok kredit line,
//! both written by the remote.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartItem};
use crate::error::{CoreError, CoreResult};
use crate::money::Rupiah;
use crate::types::{PaymentMethod, Product};
use crate::validation::{validate_price, validate_quantity};

// =============================================================================
// Tender
// =============================================================================

/// What the customer hands over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Tender {
    /// Notes and coins; change is given back.
    Cash { tendered: Rupiah },
    /// QRIS scan for the exact total.
    Qris,
}

impl Tender {
    pub fn method(&self) -> PaymentMethod {
        match self {
            Tender::Cash { .. } => PaymentMethod::Cash,
            Tender::Qris => PaymentMethod::Qris,
        }
    }
}

// =============================================================================
// Checkout Request
// =============================================================================

/// One sold line as the sheet script expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutLine {
    pub id: String,
    #[ts(type = "number")]
    pub qty: i64,
    pub nama: String,
    /// Unit sale price frozen in the cart.
    pub harga: Rupiah,
}

impl From<&CartItem> for CheckoutLine {
    fn from(item: &CartItem) -> Self {
        CheckoutLine {
            id: item.product.id.clone(),
            qty: item.qty,
            nama: item.product.name.clone(),
            harga: item.product.sale_price,
        }
    }
}

/// Payload of the CHECKOUT action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutLine>,
    pub total: Rupiah,
    pub metode: PaymentMethod,
    pub dibayar: Rupiah,
    pub kembalian: Rupiah,
}

impl CheckoutRequest {
    /// Builds the payload, settling the tender against the cart total.
    pub fn from_cart(cart: &Cart, tender: Tender) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = cart.total();
        let (paid, change) = settle(total, tender)?;

        Ok(CheckoutRequest {
            items: cart.items().iter().map(CheckoutLine::from).collect(),
            total,
            metode: tender.method(),
            dibayar: paid,
            kembalian: change,
        })
    }

    /// Units sold across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.qty).sum()
    }
}

/// Returns `(paid, change)` for a total.
pub fn settle(total: Rupiah, tender: Tender) -> CoreResult<(Rupiah, Rupiah)> {
    match tender {
        Tender::Qris => Ok((total, Rupiah::zero())),
        Tender::Cash { tendered } => {
            if tendered.is_negative() {
                return Err(CoreError::InvalidPayment {
                    reason: "tendered amount cannot be negative".to_string(),
                });
            }
            if tendered < total {
                return Err(CoreError::InvalidPayment {
                    reason: format!("{} tendered is less than total {}", tendered, total),
                });
            }
            Ok((tendered, tendered - total))
        }
    }
}

// =============================================================================
// Restock Request
// =============================================================================

/// Payload of the RESTOCK_PRODUCT action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestockRequest {
    pub id: String,
    #[ts(type = "number")]
    pub qty: i64,
    /// Unit cost paid for this delivery.
    pub harga_beli: Rupiah,
    /// `harga_beli × qty`, booked as Belanja Stok.
    pub total: Rupiah,
}

impl RestockRequest {
    /// Builds a restock for `product`.
    ///
    /// `unit_cost` defaults to the product's current `harga_beli`.
    pub fn new(product: &Product, qty: i64, unit_cost: Option<Rupiah>) -> CoreResult<Self> {
        if product.id.trim().is_empty() {
            return Err(CoreError::ProductNotFound(product.code.clone()));
        }
        validate_quantity(qty)?;
        let unit_cost = unit_cost.unwrap_or(product.cost_price);
        validate_price("harga_beli", unit_cost)?;

        Ok(RestockRequest {
            id: product.id.clone(),
            qty,
            harga_beli: unit_cost,
            total: unit_cost * qty,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_with_two_lines() -> Cart {
        let mut cart = Cart::new();
        let indomie = Product::new("1", "BRG001", "Indomie Goreng", 2500, 3500, 100);
        let aqua = Product::new("2", "BRG002", "Aqua Botol 600ml", 3000, 5000, 48);
        cart.add_product(&indomie).unwrap();
        cart.add_product(&indomie).unwrap();
        cart.add_product(&aqua).unwrap();
        cart
    }

    #[test]
    fn test_cash_checkout_computes_change() {
        let cart = cart_with_two_lines();
        let request =
            CheckoutRequest::from_cart(&cart, Tender::Cash { tendered: Rupiah::new(20_000) })
                .unwrap();

        assert_eq!(request.total, Rupiah::new(12_000));
        assert_eq!(request.dibayar, Rupiah::new(20_000));
        assert_eq!(request.kembalian, Rupiah::new(8_000));
        assert_eq!(request.metode, PaymentMethod::Cash);
        assert_eq!(request.total_quantity(), 3);
    }

    #[test]
    fn test_qris_pays_exact_total() {
        let cart = cart_with_two_lines();
        let request = CheckoutRequest::from_cart(&cart, Tender::Qris).unwrap();
        assert_eq!(request.dibayar, request.total);
        assert!(request.kembalian.is_zero());
    }

    #[test]
    fn test_insufficient_cash_is_rejected() {
        let cart = cart_with_two_lines();
        let result = CheckoutRequest::from_cart(&cart, Tender::Cash { tendered: Rupiah::new(10_000) });
        assert!(matches!(result, Err(CoreError::InvalidPayment { .. })));
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let result = CheckoutRequest::from_cart(&Cart::new(), Tender::Qris);
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_checkout_payload_shape() {
        let cart = cart_with_two_lines();
        let request = CheckoutRequest::from_cart(&cart, Tender::Qris).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["items"][0]["id"], "1");
        assert_eq!(value["items"][0]["qty"], 2);
        assert_eq!(value["items"][0]["nama"], "Indomie Goreng");
        assert_eq!(value["items"][0]["harga"], 3500);
        assert_eq!(value["total"], 12_000);
        assert_eq!(value["metode"], "qris");
    }

    #[test]
    fn test_tender_serde() {
        let tender: Tender = serde_json::from_str(r#"{"method":"cash","tendered":50000}"#).unwrap();
        assert_eq!(tender, Tender::Cash { tendered: Rupiah::new(50_000) });
        let qris: Tender = serde_json::from_str(r#"{"method":"qris"}"#).unwrap();
        assert_eq!(qris.method(), PaymentMethod::Qris);
    }

    #[test]
    fn test_restock_request() {
        let product = Product::new("4", "BRG004", "Beras Premium 5kg", 65_000, 75_000, 10);

        let request = RestockRequest::new(&product, 5, None).unwrap();
        assert_eq!(request.harga_beli, Rupiah::new(65_000));
        assert_eq!(request.total, Rupiah::new(325_000));

        let cheaper = RestockRequest::new(&product, 2, Some(Rupiah::new(60_000))).unwrap();
        assert_eq!(cheaper.total, Rupiah::new(120_000));

        assert!(RestockRequest::new(&product, 0, None).is_err());
        assert!(RestockRequest::new(&product, 1, Some(Rupiah::new(-1))).is_err());
    }
}
