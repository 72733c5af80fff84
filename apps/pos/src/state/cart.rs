//! # Cart State
//!
//! Holds the sale being rung up.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the cart
//! 2. Only one command should modify the cart at a time
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Screen Action            Command                 Cart State Change     │
//! │  ─────────────            ───────                 ─────────────────     │
//! │                                                                         │
//! │  Tap Product ────────────► add_to_cart() ───────► qty + 1 (≤ stok)     │
//! │                                                                         │
//! │  Tap + / − ──────────────► change_cart_qty() ───► qty ± 1, 0 removes   │
//! │                                                                         │
//! │  Tap Trash ──────────────► remove_from_cart() ──► line removed         │
//! │                                                                         │
//! │  Checkout OK ────────────► checkout() ──────────► cleared              │
//! │                                                                         │
//! │  View Cart ──────────────► cart() ──────────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart math itself lives in `amsa_core::cart`; this file only guards it.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use ts_rs::TS;

use amsa_core::cart::{Cart, CartItem, CartTotals};

use crate::error::{ApiError, ApiResult};

/// Cart contents plus totals, as the POS panel shows them.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Shared cart.
///
/// A poisoned lock is reported as an internal error rather than a panic.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|c| CartTotals::from(c))?;
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self
            .cart
            .lock()
            .map_err(|_| ApiError::internal("Cart lock poisoned"))?;
        Ok(f(&cart))
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_product(&product))??;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self
            .cart
            .lock()
            .map_err(|_| ApiError::internal("Cart lock poisoned"))?;
        Ok(f(&mut cart))
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> ApiResult<Cart> {
        self.with_cart(Cart::clone)
    }

    pub fn clear(&self) -> ApiResult<()> {
        self.with_cart_mut(Cart::clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amsa_core::{Product, Rupiah};

    #[test]
    fn test_shared_between_clones() {
        let state = CartState::new();
        let other = state.clone();
        let indomie = Product::new("1", "BRG001", "Indomie Goreng", 2500, 3500, 100);

        state
            .with_cart_mut(|c| c.add_product(&indomie))
            .unwrap()
            .unwrap();

        let view = other.with_cart(|c| CartView::from(c)).unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.totals.total, Rupiah::new(3500));
    }

    #[test]
    fn test_clear() {
        let state = CartState::new();
        let aqua = Product::new("2", "BRG002", "Aqua Botol 600ml", 3000, 5000, 48);
        state
            .with_cart_mut(|c| c.add_product(&aqua))
            .unwrap()
            .unwrap();

        state.clear().unwrap();
        assert!(state.snapshot().unwrap().is_empty());
    }
}
