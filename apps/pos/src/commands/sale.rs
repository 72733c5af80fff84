//! # Sale Commands
//!
//! Checkout and receipt.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout                                           │
//! │                                                                         │
//! │  checkout(Tender::Cash { tendered: 20.000 })                            │
//! │        │                                                                │
//! │        ├── cart empty?          ──► CART_ERROR, nothing sent            │
//! │        ├── tendered < total?    ──► PAYMENT_ERROR, nothing sent         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  POST CHECKOUT { items, total, metode, dibayar, kembalian }             │
//! │        │                                                                │
//! │        ├── {status:"error"}     ──► REMOTE_ERROR, cart kept             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  cart cleared ──► refresh() ──► Receipt                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};
use ts_rs::TS;

use amsa_client::{Action, SheetBackend};
use amsa_core::bookkeeping::iso_timestamp;
use amsa_core::cart::CartItem;
use amsa_core::checkout::{CheckoutRequest, Tender};
use amsa_core::{PaymentMethod, Rupiah, View};

use crate::error::ApiResult;
use crate::state::LoadOutcome;
use crate::PosApp;

/// One printed line of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    #[ts(type = "number")]
    pub quantity: i64,
    pub unit_price: Rupiah,
    pub line_total: Rupiah,
}

impl From<&CartItem> for ReceiptLine {
    fn from(item: &CartItem) -> Self {
        ReceiptLine {
            name: item.product.name.clone(),
            quantity: item.qty,
            unit_price: item.product.sale_price,
            line_total: item.line_total(),
        }
    }
}

/// What the success screen shows after a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Ledger id of the sale, when the sheet reports it.
    pub transaction_id: Option<String>,
    pub store_name: String,
    pub cashier: String,
    pub timestamp: String,
    pub lines: Vec<ReceiptLine>,
    pub total: Rupiah,
    pub method: PaymentMethod,
    pub tendered: Rupiah,
    pub change: Rupiah,
    pub refresh: LoadOutcome,
}

impl<B: SheetBackend> PosApp<B> {
    /// Sells the cart.
    ///
    /// The cart survives any failure; it is cleared only once the sheet has
    /// accepted the sale.
    #[instrument(skip(self))]
    pub async fn checkout(&self, tender: Tender) -> ApiResult<Receipt> {
        let cashier = self.require_view(View::Pos)?;
        let cart = self.cart.snapshot()?;
        let request = CheckoutRequest::from_cart(&cart, tender)?;

        let result = self.mutate(Action::Checkout, &request).await?;
        self.cart.clear()?;

        info!(
            total = %request.total,
            method = ?request.metode,
            units = request.total_quantity(),
            "Sale completed"
        );

        Ok(Receipt {
            transaction_id: result.id,
            store_name: self.config.store_name(),
            cashier: cashier.username,
            timestamp: iso_timestamp(Utc::now()),
            lines: cart.items().iter().map(ReceiptLine::from).collect(),
            total: request.total,
            method: request.metode,
            tendered: request.dibayar,
            change: request.kembalian,
            refresh: result.refresh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::app_as;
    use amsa_core::report::cash_balance;
    use amsa_core::{LedgerCategory, UserRole};

    #[tokio::test]
    async fn test_cash_checkout() {
        let app = app_as(UserRole::Kasir).await;
        app.add_to_cart("1").unwrap();
        app.add_to_cart("1").unwrap();
        app.add_to_cart("2").unwrap();

        let receipt = app
            .checkout(Tender::Cash {
                tendered: Rupiah::new(20_000),
            })
            .await
            .unwrap();

        assert_eq!(receipt.total, Rupiah::new(12_000));
        assert_eq!(receipt.change, Rupiah::new(8_000));
        assert_eq!(receipt.method, PaymentMethod::Cash);
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.store_name, "Amsa Mart");
        assert!(receipt.refresh.is_fresh());

        assert!(app.cart().unwrap().items.is_empty());
        assert_eq!(app.find_product("1").unwrap().stock, 98);

        let snapshot = app.snapshot().current();
        assert!(snapshot
            .ledger
            .iter()
            .any(|e| e.category == LedgerCategory::Sales && e.debit == Rupiah::new(12_000)));
        assert_eq!(cash_balance(&snapshot.ledger), Rupiah::new(3_512_000));
    }

    #[tokio::test]
    async fn test_qris_pays_exact() {
        let app = app_as(UserRole::Kasir).await;
        app.add_to_cart("4").unwrap();
        let receipt = app.checkout(Tender::Qris).await.unwrap();
        assert_eq!(receipt.tendered, Rupiah::new(75_000));
        assert_eq!(receipt.change, Rupiah::zero());
    }

    #[tokio::test]
    async fn test_short_cash_sends_nothing() {
        let app = app_as(UserRole::Kasir).await;
        app.add_to_cart("4").unwrap();

        let err = app
            .checkout(Tender::Cash {
                tendered: Rupiah::new(50_000),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(app.snapshot().version(), 1);
        assert_eq!(app.cart().unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let app = app_as(UserRole::Kasir).await;
        let err = app.checkout(Tender::Qris).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_network_failure_keeps_cart() {
        let app = app_as(UserRole::Kasir).await;
        app.add_to_cart("5").unwrap();
        app.backend().set_unreachable(true);

        let err = app.checkout(Tender::Qris).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(app.cart().unwrap().items.len(), 1);
    }
}
