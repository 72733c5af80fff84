//! # Client Error Types
//!
//! Error types for everything that leaves the process.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Protocol            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Remote (status=error)  │ │
//! │  │  InvalidUrl     │  │  HttpStatus     │  │  UnexpectedResponse     │ │
//! │  │  ConfigLoad/Save│  │                 │  │  (De)Serialization      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │    Session      │   Nothing here is retried. A failed call is      │
//! │  │                 │   reported once and the caller keeps whatever     │
//! │  │  SessionIo      │   data it already had.                            │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure outside the pure core.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Endpoint URL is not a usable http(s) URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request never got an HTTP answer (DNS, TLS, connection reset...).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Endpoint answered with a non-success HTTP status.
    #[error("Server returned HTTP {status}")]
    HttpStatus { status: u16 },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Endpoint answered `{status: "error"}`.
    #[error("{message}")]
    Remote { message: String },

    /// Body parsed as JSON but not in a shape we understand.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Failed to serialize a request.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize a response.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Reading or writing the saved session failed.
    #[error("Session storage error: {0}")]
    SessionIo(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ClientError::DeserializationFailed(err.to_string())
        } else {
            ClientError::SerializationFailed(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ClientError::HttpStatus {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            ClientError::DeserializationFailed(err.to_string())
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the endpoint could not be reached or answered badly.
    ///
    /// These are the failures that leave the POS running on its last
    /// snapshot.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            ClientError::ConnectionFailed(_)
                | ClientError::HttpStatus { .. }
                | ClientError::UnexpectedResponse(_)
                | ClientError::DeserializationFailed(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the endpoint understood the request and refused it.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, ClientError::Remote { .. })
    }
}
