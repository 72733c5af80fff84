//! # Inventory Commands
//!
//! Loading data, browsing the catalog and managing products.
//!
//! ## Restock Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Beras Premium 5kg   stok 3  ⚠ low         [Pesan]  [Restock]           │
//! │                                               │         │               │
//! │            mark_ordered(id, true) ◄───────────┘         │               │
//! │            UPDATE_PRODUCT {status_pemesanan: "ordered"} │               │
//! │                                                         ▼               │
//! │            restock_product(id, 10, None)                                │
//! │            RESTOCK_PRODUCT {id, qty: 10, harga_beli: 65000,             │
//! │                             total: 650000}                              │
//! │                 sheet: stok += 10, flag cleared,                        │
//! │                        + "Belanja Stok" kredit 650.000                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, instrument, warn};

use amsa_client::{Action, IdPayload, SheetBackend};
use amsa_core::checkout::RestockRequest;
use amsa_core::validation::{validate_product, validate_search_query};
use amsa_core::{CoreError, Product, ReorderStatus, Rupiah, View, DEFAULT_PRODUCT_CATEGORY};

use crate::commands::MutationResult;
use crate::error::{ApiError, ApiResult};
use crate::state::LoadOutcome;
use crate::PosApp;

impl<B: SheetBackend> PosApp<B> {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetches both sheets and installs them as the new snapshot.
    ///
    /// Never fails: when either fetch fails the previous snapshot stays in
    /// place and the error comes back as [`LoadOutcome::Stale`].
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> LoadOutcome {
        let (inventory, ledger) =
            tokio::join!(self.backend.fetch_inventory(), self.backend.fetch_ledger());

        match (inventory, ledger) {
            (Ok(inventory), Ok(ledger)) => {
                let products = inventory.len();
                let lines = ledger.len();
                let version = self.snapshot.replace(inventory, ledger);
                info!(version, products, lines, "Snapshot refreshed");
                LoadOutcome::Fresh { version }
            }
            (Err(e), _) | (_, Err(e)) => {
                let version = self.snapshot.version();
                let message = ApiError::from(e).message;
                warn!(version, %message, "Refresh failed, keeping last snapshot");
                LoadOutcome::Stale { version, message }
            }
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// All products in the current snapshot.
    pub fn inventory(&self) -> ApiResult<Vec<Product>> {
        self.require_view(View::Pos)?;
        Ok(self.snapshot.current().inventory.clone())
    }

    /// Products whose name or code contains `query`, ignoring case.
    pub fn search_products(&self, query: &str) -> ApiResult<Vec<Product>> {
        self.require_view(View::Pos)?;
        let query = validate_search_query(query)?;
        Ok(self
            .snapshot
            .current()
            .inventory
            .iter()
            .filter(|p| p.matches_search(&query))
            .cloned()
            .collect())
    }

    /// Products below the low-stock threshold.
    pub fn low_stock(&self) -> ApiResult<Vec<Product>> {
        self.require_view(View::Inventory)?;
        Ok(self
            .snapshot
            .current()
            .inventory
            .iter()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect())
    }

    // =========================================================================
    // Product CRUD
    // =========================================================================

    /// Adds a product. The sheet assigns the id.
    #[instrument(skip(self, product), fields(kode = %product.code))]
    pub async fn add_product(&self, product: Product) -> ApiResult<MutationResult> {
        self.require_view(View::Inventory)?;

        let mut product = normalize(product);
        product.id.clear();
        product.order_status = ReorderStatus::None;
        validate_product(&product)?;
        self.ensure_code_free(&product.code, None)?;

        self.mutate(Action::AddProduct, &product).await
    }

    /// Replaces a product row.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn update_product(&self, product: Product) -> ApiResult<MutationResult> {
        self.require_view(View::Inventory)?;

        let product = normalize(product);
        self.find_product(&product.id)?;
        validate_product(&product)?;
        self.ensure_code_free(&product.code, Some(&product.id))?;

        self.mutate(Action::UpdateProduct, &product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ApiResult<MutationResult> {
        self.require_view(View::Inventory)?;
        self.find_product(id)?;
        self.mutate(Action::DeleteProduct, &IdPayload::new(id)).await
    }

    /// Books a delivery: stock up, cost booked as Belanja Stok by the sheet.
    ///
    /// `unit_cost` defaults to the product's current `harga_beli`.
    #[instrument(skip(self))]
    pub async fn restock_product(
        &self,
        id: &str,
        qty: i64,
        unit_cost: Option<Rupiah>,
    ) -> ApiResult<MutationResult> {
        self.require_view(View::Inventory)?;
        let product = self.find_product(id)?;
        let request = RestockRequest::new(&product, qty, unit_cost)?;
        info!(kode = %product.code, qty, total = %request.total, "Restocking");
        self.mutate(Action::RestockProduct, &request).await
    }

    /// Flags (or unflags) a product as already reordered.
    #[instrument(skip(self))]
    pub async fn mark_ordered(&self, id: &str, ordered: bool) -> ApiResult<MutationResult> {
        self.require_view(View::Inventory)?;
        let mut product = self.find_product(id)?;
        product.order_status = if ordered {
            ReorderStatus::Ordered
        } else {
            ReorderStatus::None
        };
        self.mutate(Action::UpdateProduct, &product).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    pub(crate) fn find_product(&self, id: &str) -> ApiResult<Product> {
        self.snapshot
            .current()
            .product(id)
            .cloned()
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
    }

    fn ensure_code_free(&self, code: &str, except_id: Option<&str>) -> ApiResult<()> {
        let snapshot = self.snapshot.current();
        let taken = snapshot
            .inventory
            .iter()
            .any(|p| p.code == code && Some(p.id.as_str()) != except_id);
        if taken {
            return Err(ApiError::validation(format!("kode '{}' already exists", code)));
        }
        Ok(())
    }
}

/// Trims text fields and fills a blank category.
fn normalize(mut product: Product) -> Product {
    product.code = product.code.trim().to_string();
    product.name = product.name.trim().to_string();
    product.category = product.category.trim().to_string();
    if product.category.is_empty() {
        product.category = DEFAULT_PRODUCT_CATEGORY.to_string();
    }
    product
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::app_as;
    use amsa_core::UserRole;

    #[tokio::test]
    async fn test_refresh_loads_demo_data() {
        let app = app_as(UserRole::Kasir).await;
        assert_eq!(app.inventory().unwrap().len(), 5);
        assert_eq!(app.snapshot().version(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_snapshot() {
        let app = app_as(UserRole::Admin).await;
        app.backend().set_unreachable(true);

        let outcome = app.refresh().await;
        assert!(!outcome.is_fresh());
        assert_eq!(outcome.version(), 1);
        assert!(matches!(outcome, LoadOutcome::Stale { ref message, .. } if !message.is_empty()));
        assert_eq!(app.inventory().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_first_load_failure_leaves_empty_snapshot() {
        let app = app_as(UserRole::Admin).await;
        app.logout().unwrap();
        app.session
            .set(amsa_core::User::new("Admin", UserRole::Admin))
            .unwrap();
        app.backend().set_unreachable(true);

        assert!(!app.refresh().await.is_fresh());
        assert!(app.inventory().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_by_name_or_code() {
        let app = app_as(UserRole::Kasir).await;
        let hits = app.search_products("  kopi ").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "BRG005");

        assert_eq!(app.search_products("brg00").unwrap().len(), 5);
        assert_eq!(app.search_products("").unwrap().len(), 5);
        assert!(app.search_products("sabun").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_low_stock() {
        let app = app_as(UserRole::Admin).await;
        assert!(app.low_stock().unwrap().is_empty());

        let mut beras = app.search_products("BRG004").unwrap().remove(0);
        beras.stock = 3;
        app.update_product(beras).await.unwrap();

        let low = app.low_stock().unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].code, "BRG004");
    }

    #[tokio::test]
    async fn test_add_product_defaults_category() {
        let app = app_as(UserRole::Admin).await;
        let gula = Product::new("", " BRG006 ", "Gula Pasir 1kg", 14_000, 16_500, 20)
            .with_category(" ");
        let result = app.add_product(gula).await.unwrap();
        assert!(result.refresh.is_fresh());

        let gula = app.search_products("BRG006").unwrap().remove(0);
        assert_eq!(Some(gula.id.clone()), result.id);
        assert_eq!(gula.category, DEFAULT_PRODUCT_CATEGORY);
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected_locally() {
        let app = app_as(UserRole::Admin).await;
        let err = app
            .add_product(Product::new("", "BRG001", "Indomie Soto", 2500, 3500, 10))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_kasir_cannot_edit_products() {
        let app = app_as(UserRole::Kasir).await;
        let err = app.delete_product("1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(app.inventory().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_restock_books_stock_purchase() {
        let app = app_as(UserRole::Admin).await;
        app.mark_ordered("4", true).await.unwrap();
        assert!(app.find_product("4").unwrap().is_ordered());

        let result = app.restock_product("4", 10, None).await.unwrap();
        assert_eq!(result.refresh.version(), 3);

        let beras = app.find_product("4").unwrap();
        assert_eq!(beras.stock, 20);
        assert!(!beras.is_ordered());

        let book = app.cash_book().unwrap();
        assert!(book
            .entries
            .iter()
            .any(|e| e.credit == Rupiah::new(650_000) && e.description.contains("Beras")));
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let app = app_as(UserRole::Admin).await;
        let err = app.restock_product("99", 1, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
