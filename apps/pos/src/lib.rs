//! # Amsa Mart POS Library
//!
//! Application layer of the Amsa Mart point of sale: the state the screens
//! read and the commands they call. Rendering lives elsewhere; everything
//! here is plain Rust callable from any front-end shell.
//!
//! ## Module Organization
//! ```text
//! amsa_pos/
//! ├── lib.rs           ◄─── You are here (PosApp + tracing setup)
//! ├── state/
//! │   ├── mod.rs       ◄─── State type exports
//! │   ├── snapshot.rs  ◄─── Last good inventory + ledger
//! │   ├── cart.rs      ◄─── Cart state management
//! │   ├── session.rs   ◄─── Logged-in user, view gating
//! │   ├── config.rs    ◄─── Store name, profit method, endpoint URL
//! │   └── report_cache.rs ◄─ Memoized financial reports
//! ├── commands/
//! │   ├── mod.rs       ◄─── Command exports
//! │   ├── auth.rs      ◄─── Login / logout / restore
//! │   ├── inventory.rs ◄─── Refresh, search, product CRUD, restock
//! │   ├── cart.rs      ◄─── Cart manipulation commands
//! │   ├── sale.rs      ◄─── Checkout and receipt
//! │   ├── ledger.rs    ◄─── Cash book, capital, expense, prive
//! │   ├── reports.rs   ◄─── Financial report
//! │   └── admin.rs     ◄─── Settings, user reset
//! └── error.rs         ◄─── API error type for commands
//! ```
//!
//! ## Command Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every mutation                                       │
//! │                                                                         │
//! │  1. require_view(...)      role gate                                    │
//! │  2. validate locally       against the current snapshot                 │
//! │  3. submit(action)         exactly one POST, no retry                   │
//! │  4. refresh()              both GETs, snapshot version + 1              │
//! │                            (a failed refresh is reported, not raised)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use amsa_client::{AnyBackend, ClientConfig, SessionStore, SheetBackend};

pub use commands::{CashBook, MutationResult, Receipt, ReceiptLine};
pub use error::{ApiError, ApiResult, ErrorCode};
use state::{CartState, ConfigState, ReportCache, SessionState, SnapshotState};

/// The running POS over one backend.
#[derive(Debug)]
pub struct PosApp<B: SheetBackend> {
    pub(crate) backend: B,
    pub(crate) snapshot: SnapshotState,
    pub(crate) cart: CartState,
    pub(crate) session: SessionState,
    pub(crate) config: ConfigState,
    pub(crate) reports: ReportCache,
}

impl<B: SheetBackend> PosApp<B> {
    /// Assembles the app from its parts.
    pub fn new(backend: B, config: ConfigState, session: SessionState) -> Self {
        PosApp {
            backend,
            snapshot: SnapshotState::new(),
            cart: CartState::new(),
            session,
            config,
            reports: ReportCache::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> &SnapshotState {
        &self.snapshot
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }
}

impl PosApp<AnyBackend> {
    /// Starts the POS the way a desktop shell would.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Application Startup                               │
    /// │                                                                         │
    /// │  1. Load Config ──────────────────────────────────────────────────────► │
    /// │     • amsa.toml in the platform config dir, then AMSA_* env            │
    /// │     • broken file → defaults, with a warning                            │
    /// │                                                                         │
    /// │  2. Pick Backend ─────────────────────────────────────────────────────► │
    /// │     • demo = true → in-memory sample data                               │
    /// │     • otherwise   → HTTP to the saved (or built-in) script URL          │
    /// │                                                                         │
    /// │  3. Restore Session ──────────────────────────────────────────────────► │
    /// │     • session.json in the platform data dir                             │
    /// │                                                                         │
    /// │  4. First Refresh (only when someone is logged in) ───────────────────► │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn launch() -> ApiResult<Self> {
        info!("Starting Amsa Mart POS");

        let config = ClientConfig::load_or_default(None);
        let backend = AnyBackend::from_config(&config)?;

        let session = match SessionStore::default_location() {
            Ok(store) => SessionState::with_store(store),
            Err(e) => {
                warn!(error = %e, "No session directory; login will not be remembered");
                SessionState::new()
            }
        };

        let app = PosApp::new(backend, ConfigState::new(config), session);
        if app.restore_session()?.is_some() {
            let outcome = app.refresh().await;
            info!(?outcome, "Initial load");
        }
        Ok(app)
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=amsa_client=trace` - Show trace for the sheet client only
/// - Default: `info` plus `debug` for the three amsa crates
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,amsa_core=debug,amsa_client=debug,amsa_pos=debug")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{init_tracing, PosApp};
    use crate::state::{ConfigState, SessionState};
    use amsa_client::MemoryBackend;
    use amsa_core::{User, UserRole};

    /// Demo-backed app with `role` logged in and data loaded.
    pub async fn app_as(role: UserRole) -> PosApp<MemoryBackend> {
        init_tracing();
        let app = PosApp::new(
            MemoryBackend::with_demo_data(),
            ConfigState::default(),
            SessionState::new(),
        );
        app.session
            .set(User::new(format!("{:?}", role), role))
            .unwrap();
        assert!(app.refresh().await.is_fresh());
        app
    }
}
