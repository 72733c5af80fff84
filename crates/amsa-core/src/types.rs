//! # Domain Types
//!
//! Core domain types used throughout Amsa Mart.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  LedgerEntry    │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  username       │       │
//! │  │  kode (SKU)     │   │  tanggal (ISO)  │   │  role           │       │
//! │  │  nama           │   │  deskripsi      │   └─────────────────┘       │
//! │  │  harga_beli     │   │  debit  (in)    │                              │
//! │  │  harga_jual     │   │  kredit (out)   │   ┌─────────────────┐       │
//! │  │  stok           │   │  kategori       │   │    UserRole     │       │
//! │  │  kategori       │   └─────────────────┘   │  admin          │       │
//! │  │  status_pemesanan│                         │  kasir          │       │
//! │  └─────────────────┘                         │  manager        │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Rust fields use English names; serde renames map them to the sheet's
//! Indonesian column headers (`harga_beli`, `kredit`, ...). Every numeric
//! column goes through the lenient readers in [`lenient`] because the sheet
//! returns numbers, numeric strings and blanks interchangeably.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::category::{classify, AccountingRole, LedgerCategory};
use crate::money::Rupiah;
use crate::report::Period;
use crate::{DEFAULT_PRODUCT_CATEGORY, LOW_STOCK_THRESHOLD};

// =============================================================================
// Reorder Status
// =============================================================================

/// Whether a restock order has been placed with the supplier.
///
/// Stored in `status_pemesanan` as `"ordered"` or an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReorderStatus {
    #[default]
    None,
    Ordered,
}

impl ReorderStatus {
    /// Sheet value for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReorderStatus::None => "",
            ReorderStatus::Ordered => "ordered",
        }
    }
}

impl Serialize for ReorderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReorderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::text(deserializer)?;
        if raw.trim().eq_ignore_ascii_case("ordered") {
            Ok(ReorderStatus::Ordered)
        } else {
            Ok(ReorderStatus::None)
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product on the shelf.
///
/// ## Invariant
/// `stock >= 0`. The remote sheet owns stock changes (checkout decrements,
/// restock increments); this type only mirrors the last fetched value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Row identifier assigned by the sheet (empty for a new product).
    #[serde(default, deserialize_with = "lenient::text")]
    #[ts(type = "string")]
    pub id: String,

    /// SKU code shown on the POS tile.
    #[serde(rename = "kode")]
    #[serde(default, deserialize_with = "lenient::text")]
    #[ts(type = "string")]
    pub code: String,

    /// Display name.
    #[serde(rename = "nama")]
    #[serde(default, deserialize_with = "lenient::text")]
    #[ts(type = "string")]
    pub name: String,

    /// Unit cost. Stock is valued at this price.
    #[serde(rename = "harga_beli", default)]
    pub cost_price: Rupiah,

    /// Unit sale price.
    #[serde(rename = "harga_jual", default)]
    pub sale_price: Rupiah,

    /// Quantity on hand.
    #[serde(rename = "stok")]
    #[serde(default, deserialize_with = "lenient::count")]
    #[ts(type = "number")]
    pub stock: i64,

    /// Free-form product group ("Makanan", "Minuman", ...).
    #[serde(rename = "kategori")]
    #[serde(default, deserialize_with = "lenient::text")]
    #[ts(type = "string")]
    pub category: String,

    /// Reorder flag.
    #[serde(rename = "status_pemesanan", default)]
    #[ts(as = "String")]
    pub order_status: ReorderStatus,
}

impl Product {
    /// Creates a product in the default category.
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        cost_price: i64,
        sale_price: i64,
        stock: i64,
    ) -> Self {
        Product {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            cost_price: Rupiah::new(cost_price),
            sale_price: Rupiah::new(sale_price),
            stock,
            category: DEFAULT_PRODUCT_CATEGORY.to_string(),
            order_status: ReorderStatus::None,
        }
    }

    /// Sets the product category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Capital tied up in this product (`harga_beli × stok`).
    #[inline]
    pub fn asset_value(&self) -> Rupiah {
        self.cost_price.multiply_quantity(self.stock)
    }

    /// What the shelf would bring in if sold at list price (`harga_jual × stok`).
    #[inline]
    pub fn potential_revenue(&self) -> Rupiah {
        self.sale_price.multiply_quantity(self.stock)
    }

    /// Margin per unit at current prices.
    #[inline]
    pub fn unit_margin(&self) -> Rupiah {
        self.sale_price - self.cost_price
    }

    /// True when nothing is left to sell.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    /// True when stock is below [`LOW_STOCK_THRESHOLD`].
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    /// True when a restock order is already out.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.order_status == ReorderStatus::Ordered
    }

    /// Case-insensitive match on name or code.
    ///
    /// An empty query matches everything.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.code.to_lowercase().contains(&query)
    }
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// One line of the cash book (Buku Kas).
///
/// By convention exactly one of `debit`/`credit` is non-zero. Nothing
/// enforces it; every aggregate simply sums both columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    #[ts(type = "string")]
    pub id: String,

    /// ISO-8601 timestamp as stored in the sheet.
    ///
    /// Kept as text: period filtering is a prefix match on this string.
    #[serde(rename = "tanggal")]
    #[serde(default, deserialize_with = "lenient::text")]
    #[ts(type = "string")]
    pub date: String,

    #[serde(rename = "deskripsi")]
    #[serde(default, deserialize_with = "lenient::text")]
    #[ts(type = "string")]
    pub description: String,

    /// Cash in.
    #[serde(default)]
    pub debit: Rupiah,

    /// Cash out.
    #[serde(rename = "kredit", default)]
    pub credit: Rupiah,

    #[serde(rename = "kategori")]
    #[serde(default, deserialize_with = "lenient::category")]
    #[ts(as = "String")]
    pub category: LedgerCategory,
}

impl LedgerEntry {
    /// Creates an inflow line.
    pub fn debit(
        id: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        amount: Rupiah,
        category: LedgerCategory,
    ) -> Self {
        LedgerEntry {
            id: id.into(),
            date: date.into(),
            description: description.into(),
            debit: amount,
            credit: Rupiah::zero(),
            category,
        }
    }

    /// Creates an outflow line.
    pub fn credit(
        id: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        amount: Rupiah,
        category: LedgerCategory,
    ) -> Self {
        LedgerEntry {
            id: id.into(),
            date: date.into(),
            description: description.into(),
            debit: Rupiah::zero(),
            credit: amount,
            category,
        }
    }

    /// Net effect on cash (`debit - kredit`).
    #[inline]
    pub fn net(&self) -> Rupiah {
        self.debit - self.credit
    }

    /// True when `tanggal` starts with the period's `YYYY-MM`.
    #[inline]
    pub fn in_period(&self, period: &Period) -> bool {
        period.contains(self)
    }

    /// Accounting role of this line.
    #[inline]
    pub fn role(&self) -> AccountingRole {
        classify(self)
    }

    /// Parsed timestamp, if the sheet holds something readable.
    ///
    /// Accepts RFC 3339 (`2024-05-01T08:00:00.000Z`) and bare dates
    /// (`2024-05-01`, read as midnight UTC).
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

// =============================================================================
// Users & Views
// =============================================================================

/// Role of a logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Owner: every screen plus connection settings.
    Admin,
    /// Cashier: POS only.
    Kasir,
    /// Store manager: POS only.
    Manager,
}

/// Top-level screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Pos,
    Inventory,
    Ledger,
    Reports,
}

impl UserRole {
    /// Whether this role may open the given screen.
    ///
    /// ```text
    ///            POS   INVENTORY   LEDGER   REPORTS   SETTINGS
    /// admin       ✓        ✓          ✓        ✓         ✓
    /// kasir       ✓        ✗          ✗        ✗         ✗
    /// manager     ✓        ✗          ✗        ✗         ✗
    /// ```
    pub fn can_access(&self, view: View) -> bool {
        match self {
            UserRole::Admin => true,
            UserRole::Kasir | UserRole::Manager => view == View::Pos,
        }
    }

    /// Only the owner may change the endpoint URL.
    pub fn can_manage_settings(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// A logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub username: String,
    pub role: UserRole,
}

impl User {
    pub fn new(username: impl Into<String>, role: UserRole) -> Self {
        User {
            username: username.into(),
            role,
        }
    }

    /// See [`UserRole::can_access`].
    pub fn can_access(&self, view: View) -> bool {
        self.role.can_access(view)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash; change is handed back.
    Cash,
    /// QRIS code scan; pays the exact total.
    Qris,
}

// =============================================================================
// Lenient Readers
// =============================================================================

/// Deserializers that tolerate the sheet's loose typing.
pub mod lenient {
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer};
    use std::fmt;

    use crate::category::LedgerCategory;
    use crate::money::Rupiah;

    /// Reads a whole number; blanks and junk become zero.
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Rupiah::deserialize(deserializer).map(|r| r.amount())
    }

    /// Reads text; numbers are stringified and null becomes empty.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(TextVisitor)
    }

    /// Reads a category label via [`text`].
    pub fn category<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<LedgerCategory, D::Error> {
        text(deserializer).map(LedgerCategory::from)
    }

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, a number, or an empty cell")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            if v.fract() == 0.0 && v.is_finite() {
                Ok(format!("{}", v as i64))
            } else {
                Ok(v.to_string())
            }
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
            deserializer.deserialize_any(TextVisitor)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_sheet_row() {
        let json = r#"{
            "id": 3,
            "kode": "BRG003",
            "nama": "Telur Ayam (kg)",
            "harga_beli": "24000",
            "harga_jual": 28000,
            "stok": 15,
            "kategori": "Sembako",
            "status_pemesanan": ""
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, "3");
        assert_eq!(product.code, "BRG003");
        assert_eq!(product.cost_price, Rupiah::new(24_000));
        assert_eq!(product.sale_price, Rupiah::new(28_000));
        assert_eq!(product.stock, 15);
        assert_eq!(product.order_status, ReorderStatus::None);
    }

    #[test]
    fn test_product_missing_optional_columns() {
        let json = r#"{"id":"1","kode":"BRG001","nama":"Indomie","harga_beli":2500,"harga_jual":3500,"stok":100,"kategori":"Makanan"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.order_status, ReorderStatus::None);

        let ordered = r#"{"id":"1","status_pemesanan":"ordered"}"#;
        let product: Product = serde_json::from_str(ordered).unwrap();
        assert!(product.is_ordered());
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_product_serializes_with_sheet_names() {
        let product = Product::new("1", "BRG001", "Indomie Goreng", 2500, 3500, 100);
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["kode"], "BRG001");
        assert_eq!(value["harga_beli"], 2500);
        assert_eq!(value["stok"], 100);
        assert_eq!(value["kategori"], "Umum");
        assert_eq!(value["status_pemesanan"], "");
    }

    #[test]
    fn test_product_values() {
        let product = Product::new("2", "BRG002", "Aqua Botol 600ml", 3000, 5000, 48);
        assert_eq!(product.asset_value(), Rupiah::new(144_000));
        assert_eq!(product.potential_revenue(), Rupiah::new(240_000));
        assert_eq!(product.unit_margin(), Rupiah::new(2000));
    }

    #[test]
    fn test_stock_flags() {
        let mut product = Product::new("1", "BRG001", "Indomie", 2500, 3500, 5);
        assert!(!product.is_low_stock());

        product.stock = 4;
        assert!(product.is_low_stock());
        assert!(!product.is_out_of_stock());

        product.stock = 0;
        assert!(product.is_out_of_stock());
    }

    #[test]
    fn test_matches_search() {
        let product = Product::new("5", "BRG005", "Kopi Kapal Api", 1200, 2000, 200);
        assert!(product.matches_search("kopi"));
        assert!(product.matches_search("KAPAL"));
        assert!(product.matches_search("brg005"));
        assert!(product.matches_search(""));
        assert!(!product.matches_search("teh"));
    }

    #[test]
    fn test_ledger_entry_from_sheet_row() {
        let json = r#"{
            "id": "L-1",
            "tanggal": "2024-05-01T08:00:00.000Z",
            "deskripsi": "Modal Awal",
            "debit": 5000000,
            "kredit": "",
            "kategori": "Modal"
        }"#;
        let entry: LedgerEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.debit, Rupiah::new(5_000_000));
        assert!(entry.credit.is_zero());
        assert_eq!(entry.category, LedgerCategory::Capital);
        assert_eq!(entry.role(), AccountingRole::CapitalContribution);
        assert_eq!(entry.net(), Rupiah::new(5_000_000));
    }

    #[test]
    fn test_ledger_entry_null_category_is_unclassified() {
        let json = r#"{"id":"x","tanggal":"2024-05-01","debit":1000,"kredit":0,"kategori":null}"#;
        let entry: LedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.role(), AccountingRole::Unclassified);
    }

    #[test]
    fn test_timestamp_parsing() {
        let mut entry = LedgerEntry::debit(
            "1",
            "2024-05-01T08:00:00.000Z",
            "x",
            Rupiah::new(1),
            LedgerCategory::Sales,
        );
        assert!(entry.timestamp().is_some());

        entry.date = "2024-05-01".to_string();
        assert_eq!(
            entry.timestamp().map(|t| t.to_rfc3339()),
            Some("2024-05-01T00:00:00+00:00".to_string())
        );

        entry.date = "kemarin".to_string();
        assert!(entry.timestamp().is_none());
    }

    #[test]
    fn test_in_period_is_prefix_match() {
        let entry = LedgerEntry::credit(
            "1",
            "2024-05-31T23:30:00.000Z",
            "Listrik",
            Rupiah::new(150_000),
            LedgerCategory::parse("Listrik & Air"),
        );
        assert!(entry.in_period(&"2024-05".parse().unwrap()));
        assert!(!entry.in_period(&"2024-06".parse().unwrap()));
    }

    #[test]
    fn test_role_access() {
        assert!(UserRole::Admin.can_access(View::Reports));
        assert!(UserRole::Admin.can_manage_settings());

        assert!(UserRole::Kasir.can_access(View::Pos));
        assert!(!UserRole::Kasir.can_access(View::Ledger));
        assert!(!UserRole::Manager.can_access(View::Inventory));
        assert!(!UserRole::Manager.can_manage_settings());
    }

    #[test]
    fn test_user_serde() {
        let user: User = serde_json::from_str(r#"{"username":"Kasir","role":"kasir"}"#).unwrap();
        assert_eq!(user, User::new("Kasir", UserRole::Kasir));
        assert_eq!(serde_json::to_string(&View::Pos).unwrap(), "\"POS\"");
    }

    #[test]
    fn test_typescript_matches_wire_types() {
        assert_eq!(Rupiah::inline(), "number");

        let product = Product::decl();
        assert!(product.contains("kode: string"));
        assert!(product.contains("stok: number"));
        assert!(product.contains("harga_jual: Rupiah"));
        assert!(product.contains("status_pemesanan: string"));

        let entry = LedgerEntry::decl();
        assert!(entry.contains("tanggal: string"));
        assert!(entry.contains("kategori: string"));
    }
}
