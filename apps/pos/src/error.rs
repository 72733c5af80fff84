//! # API Error Type
//!
//! Unified error type for POS commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Amsa Mart                              │
//! │                                                                         │
//! │  Screen                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  app.withdraw_profit(600_000)                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Method                                                  │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Rule broken? ─── CoreError::InsufficientCash ─────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Sheet failed? ─── ClientError::Remote/Network ── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_CASH",                                         │
//! │    "message": "Cannot withdraw Rp 600.000: only Rp 500.000 ..." }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal: every error becomes a notification and the POS
//! keeps running on whatever snapshot it has.

use serde::Serialize;
use ts_rs::TS;

use amsa_client::ClientError;
use amsa_core::{CoreError, ValidationError};

/// API error returned from POS commands.
///
/// ## Serialization
/// This is what the screen receives when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: BRG009"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, cart line or ledger row not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// A bookkeeping rule refused the request
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Not enough on the shelf
    InsufficientStock,

    /// Withdrawal larger than the cash on hand
    InsufficientCash,

    /// Tendered cash does not cover the total
    PaymentError,

    /// Nobody is logged in
    Unauthorized,

    /// Logged-in role may not open this screen
    Forbidden,

    /// Endpoint could not be reached
    NetworkError,

    /// Endpoint answered `{status: "error"}`
    RemoteError,

    /// Config or session file problem
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Please log in first")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::OutOfStock { .. } | CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, message)
            }
            CoreError::NotInCart(_) | CoreError::CartTooLarge { .. } | CoreError::EmptyCart => {
                ApiError::cart(message)
            }
            CoreError::InvalidPayment { .. } => ApiError::new(ErrorCode::PaymentError, message),
            CoreError::InsufficientCash { .. } => {
                ApiError::new(ErrorCode::InsufficientCash, message)
            }
            CoreError::NotAnExpenseCategory(_) => ApiError::new(ErrorCode::BusinessLogic, message),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts client errors to API errors.
///
/// Remote rejections keep the script's own wording; transport failures
/// are logged in full but shown with a short message.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        if err.is_network_error() {
            tracing::error!(error = %err, "Sheet endpoint unreachable");
            return ApiError::new(
                ErrorCode::NetworkError,
                format!("Could not reach the spreadsheet: {}", err),
            );
        }
        if err.is_config_error() {
            return ApiError::new(ErrorCode::ConfigError, err.to_string());
        }
        match err {
            ClientError::Remote { message } => ApiError::new(ErrorCode::RemoteError, message),
            ClientError::SessionIo(e) => {
                ApiError::new(ErrorCode::ConfigError, format!("Session storage error: {}", e))
            }
            other => {
                tracing::error!(error = %other, "Client error");
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result alias for command methods.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use amsa_core::Rupiah;

    #[test]
    fn test_insufficient_cash_maps_to_its_own_code() {
        let err: ApiError = CoreError::InsufficientCash {
            requested: Rupiah::new(600_000),
            available: Rupiah::new(500_000),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientCash);
        assert!(err.message.contains("Rp 600.000"));
    }

    #[test]
    fn test_remote_message_is_kept_verbatim() {
        let err: ApiError = ClientError::Remote {
            message: "Stok Indomie tidak cukup".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::RemoteError);
        assert_eq!(err.message, "Stok Indomie tidak cukup");
    }

    #[test]
    fn test_network_error_code() {
        let err: ApiError = ClientError::ConnectionFailed("refused".into()).into();
        assert_eq!(err.code, ErrorCode::NetworkError);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_found("Product", "BRG009")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: BRG009");
    }
}
