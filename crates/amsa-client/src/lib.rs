//! # amsa-client: Spreadsheet Endpoint Client for Amsa Mart
//!
//! This crate connects the POS to its source of truth, a Google Sheet
//! fronted by an Apps Script web app, and keeps the local files the POS
//! needs between launches.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Layer Architecture                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 SheetBackend (trait, backend.rs)                 │  │
//! │  │                                                                  │  │
//! │  │  fetch_inventory()  fetch_ledger()  post(ActionRequest)          │  │
//! │  │  submit(): post + {status:"error"} → ClientError::Remote         │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  HttpBackend   │  │ MemoryBackend  │  │  AnyBackend            │    │
//! │  │                │  │                │  │                        │    │
//! │  │ reqwest GET/   │  │ Demo sheet in  │  │ Picked from config:    │    │
//! │  │ POST to the    │  │ memory, seeded │  │ demo flag → Memory     │    │
//! │  │ script URL     │  │ with samples   │  │ otherwise → Http       │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   protocol     │  │    config      │  │     SessionStore       │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Action names,  │  │ amsa.toml +    │  │ session.json with the  │    │
//! │  │ replies, rows  │  │ AMSA_* env     │  │ logged-in user         │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Model
//!
//! The endpoint is slow and occasionally unreachable. Nothing here retries:
//! a failed read returns an error and the application keeps whatever it
//! loaded last; a failed write returns an error and nothing is queued.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod protocol;
pub mod session;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use backend::{submit, AnyBackend, SheetBackend};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use protocol::{Action, ActionRequest, ApiResponse, IdPayload, LoginPayload, LoginReply};
pub use session::SessionStore;
