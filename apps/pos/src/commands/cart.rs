//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│  Tender  │────►│  Sold    │       │
//! │  │  Cart    │     │          │     │ Cash/QRIS│     │ (cleared)│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart         checkout                         │
//! │                   change_qty          (sale.rs)                        │
//! │                   remove                                                │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock limits are checked against the current snapshot; the sheet
//! checks again at checkout.

use tracing::debug;

use amsa_client::SheetBackend;
use amsa_core::View;

use crate::error::ApiResult;
use crate::state::CartView;
use crate::PosApp;

impl<B: SheetBackend> PosApp<B> {
    /// Current cart with totals.
    pub fn cart(&self) -> ApiResult<CartView> {
        self.require_view(View::Pos)?;
        self.cart.with_cart(|c| CartView::from(c))
    }

    /// Adds one unit of a product from the current snapshot.
    ///
    /// ## Behavior
    /// - Out of stock: refused
    /// - Already in cart: quantity + 1, refused at the current stock level
    /// - Price is frozen at the moment of tapping
    pub fn add_to_cart(&self, product_id: &str) -> ApiResult<CartView> {
        self.require_view(View::Pos)?;
        let product = self.find_product(product_id)?;
        debug!(product_id = %product_id, kode = %product.code, "add_to_cart");

        self.cart.with_cart_mut(|c| c.add_product(&product))??;
        self.cart.with_cart(|c| CartView::from(c))
    }

    /// Moves a line up or down. Reaching zero removes the line.
    pub fn change_cart_quantity(&self, product_id: &str, delta: i64) -> ApiResult<CartView> {
        self.require_view(View::Pos)?;
        debug!(product_id = %product_id, delta, "change_cart_quantity");

        let snapshot = self.snapshot.current();
        self.cart.with_cart_mut(|c| {
            c.sync_stock(&snapshot.inventory);
            c.change_quantity(product_id, delta)
        })??;
        self.cart.with_cart(|c| CartView::from(c))
    }

    pub fn remove_from_cart(&self, product_id: &str) -> ApiResult<CartView> {
        self.require_view(View::Pos)?;
        debug!(product_id = %product_id, "remove_from_cart");

        self.cart.with_cart_mut(|c| c.remove(product_id))??;
        self.cart.with_cart(|c| CartView::from(c))
    }

    pub fn clear_cart(&self) -> ApiResult<CartView> {
        self.require_view(View::Pos)?;
        debug!("clear_cart");

        self.cart.clear()?;
        self.cart.with_cart(|c| CartView::from(c))
    }
}
