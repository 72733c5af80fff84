//! # HTTP Backend
//!
//! Talks to the Apps Script web app with `reqwest`.
//!
//! ## Request Shapes
//! ```text
//! fetch_inventory ──► GET  {url}?action=getInventory
//! fetch_ledger    ──► GET  {url}?action=getLedger
//! post            ──► POST {url}
//!                     Content-Type: text/plain;charset=utf-8
//!                     {"action":"CHECKOUT","payload":{...}}
//! ```
//!
//! Apps Script answers every call with a redirect to a one-off content
//! URL; reqwest follows it. No timeout is set and nothing is retried: a
//! slow sheet simply makes the caller wait.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

use amsa_core::{LedgerEntry, Product};

use crate::backend::SheetBackend;
use crate::config::validate_api_url;
use crate::error::{ClientError, ClientResult};
use crate::protocol::{parse_rows, ActionRequest, ApiResponse, Query};

/// Content type the script endpoint expects for POST bodies.
pub const POST_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Backend for a deployed Apps Script web app.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a backend for `url` (must be http or https).
    pub fn new(url: &str) -> ClientResult<Self> {
        let base_url = validate_api_url(url)?;
        let client = Client::builder()
            .user_agent(concat!("amsa-mart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;
        Ok(HttpBackend { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{url}?action=<query>`, keeping any query string already present.
    pub fn query_url(&self, query: Query) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("action", query.as_str());
        url
    }

    async fn get_rows<T: serde::de::DeserializeOwned>(&self, query: Query) -> ClientResult<Vec<T>> {
        let url = self.query_url(query);
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(query = query.as_str(), error = %e, "Fetch failed");
                ClientError::from(e)
            })?;

        let body: Value = response.json().await?;
        parse_rows(body, query)
    }
}

impl SheetBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn fetch_inventory(&self) -> ClientResult<Vec<Product>> {
        let rows: Vec<Product> = self.get_rows(Query::GetInventory).await?;
        debug!(count = rows.len(), "Fetched inventory");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn fetch_ledger(&self) -> ClientResult<Vec<LedgerEntry>> {
        let rows: Vec<LedgerEntry> = self.get_rows(Query::GetLedger).await?;
        debug!(count = rows.len(), "Fetched ledger");
        Ok(rows)
    }

    #[instrument(skip(self, request), fields(action = %request.action))]
    async fn post(&self, request: ActionRequest) -> ClientResult<ApiResponse> {
        let body = serde_json::to_string(&request)
            .map_err(|e| ClientError::SerializationFailed(e.to_string()))?;

        let response = self
            .client
            .post(self.base_url.clone())
            .header(CONTENT_TYPE, POST_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(error = %e, "POST failed");
                ClientError::from(e)
            })?;

        let reply: ApiResponse = response.json().await?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let backend = HttpBackend::new("https://script.google.com/macros/s/abc/exec").unwrap();
        assert_eq!(
            backend.query_url(Query::GetInventory).as_str(),
            "https://script.google.com/macros/s/abc/exec?action=getInventory"
        );
    }

    #[test]
    fn test_query_url_keeps_existing_params() {
        let backend = HttpBackend::new("http://localhost:8080/exec?key=1").unwrap();
        assert_eq!(
            backend.query_url(Query::GetLedger).as_str(),
            "http://localhost:8080/exec?key=1&action=getLedger"
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(HttpBackend::new("ws://localhost/sync").is_err());
        assert!(HttpBackend::new("").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let backend = HttpBackend::new("http://127.0.0.1:9/exec").unwrap();
        let err = backend.fetch_inventory().await.unwrap_err();
        assert!(err.is_network_error());
    }
}
