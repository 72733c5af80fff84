//! # Memory Backend
//!
//! Demo mode: the whole sheet lives in memory, seeded with sample data.
//!
//! ## Simulated Script Behaviour
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Action            Inventory effect           Ledger effect            │
//! │  ────────────────  ─────────────────────────  ───────────────────────  │
//! │  CHECKOUT          stok −= qty (all or none)  + Penjualan debit total  │
//! │  RESTOCK_PRODUCT   stok += qty, flag cleared  + Belanja Stok kredit    │
//! │  ADD/UPDATE/DELETE product row                -                        │
//! │  ADD_CAPITAL       -                          + draft line             │
//! │  ADD_EXPENSE       -                          + draft line             │
//! │  WITHDRAW_PROFIT   -                          + draft line (≤ kas)     │
//! │  UPDATE/DELETE_LEDGER                         row replaced / removed   │
//! │  LOGIN             -                          -  (checks demo users)   │
//! │  RESET_USERS       -                          -  (demo users restored) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejections come back as `{status: "error", message}` exactly like the
//! real script, so the application layer cannot tell the two apart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use amsa_core::bookkeeping::{iso_timestamp, LedgerDraft};
use amsa_core::checkout::{CheckoutRequest, RestockRequest};
use amsa_core::report::cash_balance;
use amsa_core::{LedgerCategory, LedgerEntry, Product, ReorderStatus, Rupiah, UserRole};

use crate::backend::SheetBackend;
use crate::error::{ClientError, ClientResult};
use crate::protocol::{Action, ActionRequest, ApiResponse, IdPayload, LoginPayload};

// =============================================================================
// Demo Data
// =============================================================================

/// Sample shelf used in demo mode.
pub fn demo_products() -> Vec<Product> {
    vec![
        Product::new("1", "BRG001", "Indomie Goreng", 2500, 3500, 100).with_category("Makanan"),
        Product::new("2", "BRG002", "Aqua Botol 600ml", 3000, 5000, 48).with_category("Minuman"),
        Product::new("3", "BRG003", "Telur Ayam (kg)", 24_000, 28_000, 15).with_category("Sembako"),
        Product::new("4", "BRG004", "Beras Premium 5kg", 65_000, 75_000, 10)
            .with_category("Sembako"),
        Product::new("5", "BRG005", "Kopi Kapal Api", 1200, 2000, 200).with_category("Minuman"),
    ]
}

/// Opening cash book used in demo mode, dated `now`.
pub fn demo_ledger() -> Vec<LedgerEntry> {
    let now = iso_timestamp(Utc::now());
    vec![
        LedgerEntry::debit(
            "1",
            now.clone(),
            "Modal Awal",
            Rupiah::new(5_000_000),
            LedgerCategory::Capital,
        ),
        LedgerEntry::credit(
            "2",
            now,
            "Belanja Stok Awal",
            Rupiah::new(1_500_000),
            LedgerCategory::StockPurchase,
        ),
    ]
}

#[derive(Debug, Clone)]
struct DemoUser {
    login: &'static str,
    password: &'static str,
    display: &'static str,
    role: UserRole,
}

fn demo_users() -> Vec<DemoUser> {
    vec![
        DemoUser {
            login: "admin",
            password: "admin123",
            display: "Admin",
            role: UserRole::Admin,
        },
        DemoUser {
            login: "kasir",
            password: "kasir123",
            display: "Kasir",
            role: UserRole::Kasir,
        },
        DemoUser {
            login: "manager",
            password: "manager123",
            display: "Manager",
            role: UserRole::Manager,
        },
    ]
}

// =============================================================================
// Memory Backend
// =============================================================================

#[derive(Debug, Default)]
struct Sheet {
    inventory: Vec<Product>,
    ledger: Vec<LedgerEntry>,
    users: Vec<DemoUser>,
}

/// In-memory stand-in for the spreadsheet.
#[derive(Debug)]
pub struct MemoryBackend {
    sheet: Mutex<Sheet>,
    unreachable: AtomicBool,
}

impl MemoryBackend {
    /// Backend holding exactly the given rows.
    pub fn with_data(inventory: Vec<Product>, ledger: Vec<LedgerEntry>) -> Self {
        MemoryBackend {
            sheet: Mutex::new(Sheet {
                inventory,
                ledger,
                users: demo_users(),
            }),
            unreachable: AtomicBool::new(false),
        }
    }

    /// Backend seeded with the demo shelf and opening cash book.
    pub fn with_demo_data() -> Self {
        Self::with_data(demo_products(), demo_ledger())
    }

    /// Empty sheet.
    pub fn empty() -> Self {
        Self::with_data(Vec::new(), Vec::new())
    }

    /// Makes every call fail as if the network were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> ClientResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ClientError::ConnectionFailed(
                "demo backend set to unreachable".to_string(),
            ));
        }
        Ok(())
    }

    fn apply(sheet: &mut Sheet, request: &ActionRequest) -> ClientResult<ApiResponse> {
        let response = match request.action {
            Action::AddCapital | Action::AddExpense => {
                let draft: LedgerDraft = request.payload_as()?;
                let id = new_id();
                sheet.ledger.push(draft.into_entry(id.clone()));
                ApiResponse::success().with_id(id)
            }
            Action::WithdrawProfit => {
                let draft: LedgerDraft = request.payload_as()?;
                if draft.credit > cash_balance(&sheet.ledger) {
                    return Ok(ApiResponse::error("Saldo kas tidak cukup"));
                }
                let id = new_id();
                sheet.ledger.push(draft.into_entry(id.clone()));
                ApiResponse::success().with_id(id)
            }
            Action::UpdateLedger => {
                let entry: LedgerEntry = request.payload_as()?;
                match sheet.ledger.iter_mut().find(|e| e.id == entry.id) {
                    Some(slot) => {
                        *slot = entry;
                        ApiResponse::success()
                    }
                    None => ApiResponse::error("Data tidak ditemukan"),
                }
            }
            Action::DeleteLedger => {
                let IdPayload { id } = request.payload_as()?;
                let before = sheet.ledger.len();
                sheet.ledger.retain(|e| e.id != id);
                if sheet.ledger.len() == before {
                    ApiResponse::error("Data tidak ditemukan")
                } else {
                    ApiResponse::success()
                }
            }
            Action::Checkout => {
                let checkout: CheckoutRequest = request.payload_as()?;
                Self::checkout(sheet, &checkout)
            }
            Action::RestockProduct => {
                let restock: RestockRequest = request.payload_as()?;
                Self::restock(sheet, &restock)
            }
            Action::AddProduct => {
                let mut product: Product = request.payload_as()?;
                if sheet.inventory.iter().any(|p| p.code == product.code) {
                    return Ok(ApiResponse::error(format!(
                        "Kode {} sudah dipakai",
                        product.code
                    )));
                }
                product.id = new_id();
                let id = product.id.clone();
                sheet.inventory.push(product);
                ApiResponse::success().with_id(id)
            }
            Action::UpdateProduct => {
                let product: Product = request.payload_as()?;
                match sheet.inventory.iter_mut().find(|p| p.id == product.id) {
                    Some(slot) => {
                        *slot = product;
                        ApiResponse::success()
                    }
                    None => ApiResponse::error("Barang tidak ditemukan"),
                }
            }
            Action::DeleteProduct => {
                let IdPayload { id } = request.payload_as()?;
                let before = sheet.inventory.len();
                sheet.inventory.retain(|p| p.id != id);
                if sheet.inventory.len() == before {
                    ApiResponse::error("Barang tidak ditemukan")
                } else {
                    ApiResponse::success()
                }
            }
            Action::Login => {
                let credentials: LoginPayload = request.payload_as()?;
                match sheet.users.iter().find(|u| {
                    u.login == credentials.username && u.password == credentials.password
                }) {
                    Some(user) => ApiResponse::success()
                        .with_data(json!({"username": user.display, "role": user.role})),
                    None => ApiResponse::error("Username atau password salah!"),
                }
            }
            Action::ResetUsers => {
                sheet.users = demo_users();
                ApiResponse::success().with_message("Pengguna dikembalikan ke bawaan")
            }
        };
        Ok(response)
    }

    fn checkout(sheet: &mut Sheet, checkout: &CheckoutRequest) -> ApiResponse {
        // Lines repeating an id draw on the same shelf.
        let mut wanted: HashMap<&str, i64> = HashMap::new();
        for line in &checkout.items {
            if line.qty <= 0 {
                return ApiResponse::error(format!("Jumlah {} tidak valid", line.nama));
            }
            let total = wanted.entry(line.id.as_str()).or_insert(0);
            *total = total.saturating_add(line.qty);
        }

        for line in &checkout.items {
            match sheet.inventory.iter().find(|p| p.id == line.id) {
                None => return ApiResponse::error(format!("Barang {} tidak ditemukan", line.nama)),
                Some(p) if p.stock < wanted[line.id.as_str()] => {
                    return ApiResponse::error(format!("Stok {} tidak cukup", p.name));
                }
                Some(_) => {}
            }
        }

        for (id, qty) in &wanted {
            if let Some(product) = sheet.inventory.iter_mut().find(|p| p.id == *id) {
                product.stock -= qty;
            }
        }

        let id = new_id();
        sheet.ledger.push(LedgerEntry::debit(
            id.clone(),
            iso_timestamp(Utc::now()),
            format!("Penjualan ({} item)", checkout.total_quantity()),
            checkout.total,
            LedgerCategory::Sales,
        ));
        ApiResponse::success()
            .with_id(id)
            .with_message("Transaksi berhasil")
    }

    fn restock(sheet: &mut Sheet, restock: &RestockRequest) -> ApiResponse {
        let Some(product) = sheet.inventory.iter_mut().find(|p| p.id == restock.id) else {
            return ApiResponse::error("Barang tidak ditemukan");
        };

        product.stock += restock.qty;
        product.cost_price = restock.harga_beli;
        product.order_status = ReorderStatus::None;
        let description = format!("Restock {} x{}", product.name, restock.qty);

        sheet.ledger.push(LedgerEntry::credit(
            new_id(),
            iso_timestamp(Utc::now()),
            description,
            restock.total,
            LedgerCategory::StockPurchase,
        ));
        ApiResponse::success()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::with_demo_data()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl SheetBackend for MemoryBackend {
    async fn fetch_inventory(&self) -> ClientResult<Vec<Product>> {
        self.check_reachable()?;
        Ok(self.sheet.lock().await.inventory.clone())
    }

    async fn fetch_ledger(&self) -> ClientResult<Vec<LedgerEntry>> {
        self.check_reachable()?;
        Ok(self.sheet.lock().await.ledger.clone())
    }

    async fn post(&self, request: ActionRequest) -> ClientResult<ApiResponse> {
        self.check_reachable()?;
        let mut sheet = self.sheet.lock().await;
        let response = Self::apply(&mut sheet, &request)?;
        if response.is_success() {
            debug!(action = %request.action, "Demo sheet updated");
        } else {
            warn!(action = %request.action, message = ?response.message, "Demo sheet rejected action");
        }
        Ok(response)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
