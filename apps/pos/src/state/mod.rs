//! # State Module
//!
//! Manages application state for the POS.
//!
//! Instead of a single struct holding everything, each concern gets its
//! own state type and each command touches only the ones it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  PosApp<B: SheetBackend>                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┼─────────┬──────────────┐                │
//! │     ▼              ▼         ▼         ▼              ▼                 │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐  │
//! │  │ Snapshot │ │  Cart    │ │ Session  │ │ Config   │ │ ReportCache  │  │
//! │  │ State    │ │  State   │ │ State    │ │ State    │ │              │  │
//! │  │          │ │          │ │          │ │          │ │ (version,    │  │
//! │  │ last good│ │ Arc<     │ │ who is   │ │ store    │ │  period,     │  │
//! │  │ inventory│ │  Mutex<  │ │ logged   │ │ name,    │ │  method)     │  │
//! │  │ + ledger │ │  Cart>>  │ │ in       │ │ profit   │ │  → report    │  │
//! │  └──────────┘ └──────────┘ └──────────┘ └──────────┘ └──────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SnapshotState: RwLock around an Arc, swapped whole on refresh       │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access          │
//! │  • SessionState / ConfigState: RwLock, rarely written                  │
//! │  • ReportCache: Mutex around a small map                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No lock is ever held across an `.await`.

mod cart;
mod config;
mod report_cache;
mod session;
mod snapshot;

pub use cart::{CartState, CartView};
pub use config::{ConfigState, SettingsView};
pub use report_cache::ReportCache;
pub use session::SessionState;
pub use snapshot::{LoadOutcome, Snapshot, SnapshotState};
