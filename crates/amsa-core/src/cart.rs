//! # Cart
//!
//! The shopping cart on the POS screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action              Cart Method             Effect                │
//! │  ───────────              ───────────             ──────                │
//! │                                                                         │
//! │  Tap product tile ──────► add_product() ────────► qty + 1 (≤ stok)     │
//! │                                                                         │
//! │  Tap + / − ─────────────► change_quantity() ────► qty ± 1, 0 removes   │
//! │                                                                         │
//! │  Type a quantity ───────► set_quantity() ───────► qty = n (≤ stok)     │
//! │                                                                         │
//! │  Tap trash ─────────────► remove() ─────────────► line gone            │
//! │                                                                         │
//! │  Checkout done ─────────► clear() ──────────────► empty                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - One line per product id
//! - `0 < qty <= stok` of the latest product snapshot handed in
//! - At most [`MAX_CART_ITEMS`] lines
//!
//! The cart is never persisted. `harga_jual` stays frozen per line while
//! `stok` follows the latest snapshot (see [`Cart::sync_stock`]); the remote
//! decrements the real stock on checkout.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Rupiah;
use crate::types::Product;
use crate::validation::{validate_cart_size, validate_quantity};
use crate::MAX_CART_ITEMS;

// =============================================================================
// Cart Item
// =============================================================================

/// A product snapshot plus how many the customer is buying.
///
/// The snapshot freezes `harga_jual` at the moment the product was tapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub product: Product,
    #[ts(type = "number")]
    pub qty: i64,
}

impl CartItem {
    pub fn new(product: &Product, qty: i64) -> Self {
        CartItem {
            product: product.clone(),
            qty,
        }
    }

    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// `harga_jual × qty`.
    pub fn line_total(&self) -> Rupiah {
        self.product.sale_price * self.qty
    }

    fn check_stock(&self, requested: i64) -> CoreResult<()> {
        if requested > self.product.stock {
            return Err(CoreError::InsufficientStock {
                code: self.product.code.clone(),
                available: self.product.stock,
                requested,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The current sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id() == product_id)
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - `stok <= 0`: rejected as out of stock
    /// - Already in cart: qty + 1, refused once qty reaches the current
    ///   `stok` of `product`; the line keeps its original price
    /// - New product: appended with qty 1
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        let existing = self.items.iter_mut().find(|i| i.product.id == product.id);
        if let Some(item) = existing {
            item.product.stock = product.stock;
            let requested = item.qty + 1;
            item.check_stock(requested)?;
            item.qty = requested;
            return Ok(());
        }

        if product.is_out_of_stock() {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        validate_cart_size(self.items.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;
        self.items.push(CartItem::new(product, 1));
        Ok(())
    }

    /// Updates each line's `stok` from `inventory`, leaving prices alone.
    ///
    /// Lines whose product is no longer listed keep their last known stock.
    pub fn sync_stock(&mut self, inventory: &[Product]) {
        for item in &mut self.items {
            if let Some(current) = inventory.iter().find(|p| p.id == item.product.id) {
                item.product.stock = current.stock;
            }
        }
    }

    /// Moves a line's quantity by `delta`.
    ///
    /// The result is floored at zero, and zero removes the line. Going above
    /// the snapshot's stock is refused and leaves the line untouched.
    pub fn change_quantity(&mut self, product_id: &str, delta: i64) -> CoreResult<()> {
        let index = self.position(product_id)?;
        let item = &mut self.items[index];

        let requested = (item.qty + delta).max(0);
        item.check_stock(requested)?;

        if requested == 0 {
            self.items.remove(index);
        } else {
            item.qty = requested;
        }
        Ok(())
    }

    /// Sets a line's quantity directly. Zero removes the line.
    pub fn set_quantity(&mut self, product_id: &str, qty: i64) -> CoreResult<()> {
        if qty == 0 {
            return self.remove(product_id);
        }
        validate_quantity(qty)?;

        let index = self.position(product_id)?;
        let item = &mut self.items[index];
        item.check_stock(qty)?;
        item.qty = qty;
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) -> CoreResult<()> {
        let index = self.position(product_id)?;
        self.items.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.qty).sum()
    }

    /// Σ harga_jual × qty.
    pub fn total(&self) -> Rupiah {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: &str) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|i| i.id() == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))
    }
}

/// Cart summary for the checkout panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    #[ts(type = "number")]
    pub total_quantity: i64,
    pub total: Rupiah,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
