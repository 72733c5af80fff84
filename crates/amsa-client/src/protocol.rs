//! # Sheet Protocol Messages
//!
//! Request and response shapes spoken by the Apps Script web app.
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sheet Endpoint Protocol                            │
//! │                                                                         │
//! │  READS (GET)                                                           │
//! │  ───────────                                                           │
//! │  GET ?action=getInventory  ───►  [ Product, ... ]                      │
//! │  GET ?action=getLedger     ───►  [ LedgerEntry, ... ]                  │
//! │                                  or { "error": "..." }  → treated as [] │
//! │                                                                         │
//! │  WRITES (POST, Content-Type: text/plain)                               │
//! │  ────────────────────────────────────────                              │
//! │  { "action": "CHECKOUT", "payload": { ... } }                          │
//! │                 ───►  { "status": "success", "message"?, "id"?, ... }  │
//! │                 ───►  { "status": "error",   "message": "..." }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The POST body is JSON sent as `text/plain` so the browser-era endpoint
//! never sees a CORS preflight; the script parses the raw body itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

use amsa_core::{User, UserRole};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Actions
// =============================================================================

/// Mutating actions accepted by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddCapital,
    AddExpense,
    WithdrawProfit,
    UpdateLedger,
    DeleteLedger,
    Checkout,
    RestockProduct,
    AddProduct,
    UpdateProduct,
    DeleteProduct,
    Login,
    ResetUsers,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AddCapital => "ADD_CAPITAL",
            Action::AddExpense => "ADD_EXPENSE",
            Action::WithdrawProfit => "WITHDRAW_PROFIT",
            Action::UpdateLedger => "UPDATE_LEDGER",
            Action::DeleteLedger => "DELETE_LEDGER",
            Action::Checkout => "CHECKOUT",
            Action::RestockProduct => "RESTOCK_PRODUCT",
            Action::AddProduct => "ADD_PRODUCT",
            Action::UpdateProduct => "UPDATE_PRODUCT",
            Action::DeleteProduct => "DELETE_PRODUCT",
            Action::Login => "LOGIN",
            Action::ResetUsers => "RESET_USERS",
        }
    }

    /// True when a successful call changes the inventory sheet.
    pub fn touches_inventory(&self) -> bool {
        matches!(
            self,
            Action::Checkout
                | Action::RestockProduct
                | Action::AddProduct
                | Action::UpdateProduct
                | Action::DeleteProduct
        )
    }

    /// True when a successful call changes the ledger sheet.
    pub fn touches_ledger(&self) -> bool {
        matches!(
            self,
            Action::AddCapital
                | Action::AddExpense
                | Action::WithdrawProfit
                | Action::UpdateLedger
                | Action::DeleteLedger
                | Action::Checkout
                | Action::RestockProduct
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only queries (`GET ?action=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    GetInventory,
    GetLedger,
}

impl Query {
    pub fn as_str(&self) -> &'static str {
        match self {
            Query::GetInventory => "getInventory",
            Query::GetLedger => "getLedger",
        }
    }
}

// =============================================================================
// Request / Response
// =============================================================================

/// Body of every POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: Action,
    pub payload: Value,
}

impl ActionRequest {
    /// Serializes `payload` into a request for `action`.
    pub fn new<P: Serialize + ?Sized>(action: Action, payload: &P) -> ClientResult<Self> {
        let payload = serde_json::to_value(payload)
            .map_err(|e| ClientError::SerializationFailed(e.to_string()))?;
        Ok(ActionRequest { action, payload })
    }

    /// Reads the payload back as a typed value.
    pub fn payload_as<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| ClientError::DeserializationFailed(e.to_string()))
    }
}

/// `status` field of a POST reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Reply to a POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ResponseStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Id of the row the action created, when the script reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Any other top-level fields (e.g. `user` on LOGIN).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    pub fn success() -> Self {
        ApiResponse {
            status: ResponseStatus::Success,
            message: None,
            id: None,
            data: None,
            extra: Map::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            ..ApiResponse::success()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Turns `{status: "error"}` into [`ClientError::Remote`].
    pub fn into_result(self) -> ClientResult<Self> {
        match self.status {
            ResponseStatus::Success => Ok(self),
            ResponseStatus::Error => Err(ClientError::Remote {
                message: self
                    .message
                    .unwrap_or_else(|| "Unknown error from server".to_string()),
            }),
        }
    }
}

/// Parses a GET body into rows.
///
/// `{ "error": ... }` is the script's way of saying the sheet could not be
/// read; it is logged and treated as an empty list. Anything other than an
/// array or that error object is a protocol failure.
pub fn parse_rows<T: DeserializeOwned>(body: Value, query: Query) -> ClientResult<Vec<T>> {
    match body {
        Value::Array(_) => serde_json::from_value(body)
            .map_err(|e| ClientError::DeserializationFailed(e.to_string())),
        Value::Object(ref map) if map.contains_key("error") => {
            warn!(query = query.as_str(), error = %map["error"], "Endpoint reported an error, treating as empty");
            Ok(Vec::new())
        }
        other => Err(ClientError::UnexpectedResponse(format!(
            "{} returned {}",
            query.as_str(),
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// `{ id }` for DELETE_PRODUCT and DELETE_LEDGER.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPayload {
    pub id: String,
}

impl IdPayload {
    pub fn new(id: impl Into<String>) -> Self {
        IdPayload { id: id.into() }
    }
}

/// Credentials for LOGIN.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginPayload")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The user carried by a successful LOGIN reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginReply {
    pub user: User,
}

impl LoginReply {
    /// Finds the user in `data`, then in a top-level `user`, then in
    /// top-level `username`/`role` fields.
    pub fn from_response(response: &ApiResponse) -> ClientResult<Self> {
        let candidate = response
            .data
            .clone()
            .or_else(|| response.extra.get("user").cloned())
            .unwrap_or_else(|| Value::Object(response.extra.clone()));

        let user: User = serde_json::from_value(candidate).map_err(|e| {
            ClientError::UnexpectedResponse(format!("LOGIN reply has no usable user: {}", e))
        })?;
        Ok(LoginReply { user })
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
