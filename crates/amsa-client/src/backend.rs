//! # Backend Seam
//!
//! The one trait the application layer talks to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                 PosApp<B: SheetBackend>                                 │
//! │                          │                                              │
//! │          ┌───────────────┼────────────────┐                             │
//! │          ▼               ▼                ▼                             │
//! │   fetch_inventory   fetch_ledger      post(ActionRequest)               │
//! │          │               │                │                             │
//! │   ┌──────┴───────────────┴────────────────┴──────┐                      │
//! │   │   HttpBackend        │      MemoryBackend    │                      │
//! │   │   (Apps Script)      │      (demo mode)      │                      │
//! │   └──────────────────────┴───────────────────────┘                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call is independent: one request, one answer, no retry.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, info};

use amsa_core::{LedgerEntry, Product};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::HttpBackend;
use crate::memory::MemoryBackend;
use crate::protocol::{Action, ActionRequest, ApiResponse};

/// Source of truth for inventory and ledger.
pub trait SheetBackend: Send + Sync {
    /// All products.
    fn fetch_inventory(&self) -> impl Future<Output = ClientResult<Vec<Product>>> + Send;

    /// All cash-book lines.
    fn fetch_ledger(&self) -> impl Future<Output = ClientResult<Vec<LedgerEntry>>> + Send;

    /// Sends one mutation and returns the raw reply.
    ///
    /// A `{status: "error"}` reply is still `Ok` here; use [`submit`] to
    /// turn it into an error.
    fn post(&self, request: ActionRequest) -> impl Future<Output = ClientResult<ApiResponse>> + Send;
}

/// Serializes, posts and checks one mutation.
pub async fn submit<B, P>(backend: &B, action: Action, payload: &P) -> ClientResult<ApiResponse>
where
    B: SheetBackend,
    P: Serialize + ?Sized,
{
    let request = ActionRequest::new(action, payload)?;
    debug!(action = %action, "Submitting action");
    let response = backend.post(request).await?.into_result()?;
    info!(action = %action, message = ?response.message, "Action accepted");
    Ok(response)
}

// =============================================================================
// Runtime-selected backend
// =============================================================================

/// Backend chosen from configuration at startup.
#[derive(Debug)]
pub enum AnyBackend {
    Http(HttpBackend),
    Memory(MemoryBackend),
}

impl AnyBackend {
    /// Demo flag picks the in-memory store, otherwise HTTP to the effective URL.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        if config.is_demo() {
            info!("Demo mode: using in-memory mock data");
            return Ok(AnyBackend::Memory(MemoryBackend::with_demo_data()));
        }
        let backend = HttpBackend::new(config.effective_api_url())?;
        info!(url = %backend.base_url(), connected = config.is_connected(), "Using sheet endpoint");
        Ok(AnyBackend::Http(backend))
    }
}

impl SheetBackend for AnyBackend {
    async fn fetch_inventory(&self) -> ClientResult<Vec<Product>> {
        match self {
            AnyBackend::Http(b) => b.fetch_inventory().await,
            AnyBackend::Memory(b) => b.fetch_inventory().await,
        }
    }

    async fn fetch_ledger(&self) -> ClientResult<Vec<LedgerEntry>> {
        match self {
            AnyBackend::Http(b) => b.fetch_ledger().await,
            AnyBackend::Memory(b) => b.fetch_ledger().await,
        }
    }

    async fn post(&self, request: ActionRequest) -> ClientResult<ApiResponse> {
        match self {
            AnyBackend::Http(b) => b.post(request).await,
            AnyBackend::Memory(b) => b.post(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::protocol::IdPayload;

    #[test]
    fn test_from_config_picks_backend() {
        let mut config = ClientConfig::default();
        assert!(matches!(
            AnyBackend::from_config(&config).unwrap(),
            AnyBackend::Http(_)
        ));

        config.api.demo = true;
        assert!(matches!(
            AnyBackend::from_config(&config).unwrap(),
            AnyBackend::Memory(_)
        ));
    }

    #[tokio::test]
    async fn test_submit_turns_error_status_into_error() {
        let backend = AnyBackend::Memory(MemoryBackend::with_demo_data());
        let result = submit(&backend, Action::DeleteProduct, &IdPayload::new("tidak-ada")).await;
        assert!(matches!(result, Err(ClientError::Remote { .. })));
    }

    #[tokio::test]
    async fn test_any_backend_delegates_reads() {
        let backend = AnyBackend::Memory(MemoryBackend::with_demo_data());
        assert_eq!(backend.fetch_inventory().await.unwrap().len(), 5);
        assert_eq!(backend.fetch_ledger().await.unwrap().len(), 2);
    }
}
