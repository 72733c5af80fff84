//! # Report Commands
//!
//! ```text
//! financial_report("2024-05")
//!      │
//!      ▼
//! ReportCache[(snapshot version, period, method)]
//!      │ hit ──────────────────────────────────────► clone
//!      │ miss
//!      ▼
//! FinancialReport::compute(ledger, inventory, period, method)
//!      cash · stock value · potential revenue · profit · monthly flow · assets
//! ```
//!
//! Reports always run on the current snapshot, stale or not; the screen
//! learns about staleness from the last `LoadOutcome`.

use tracing::debug;

use amsa_client::SheetBackend;
use amsa_core::validation::validate_period;
use amsa_core::{FinancialReport, Period, ProfitMethod, View};

use crate::error::ApiResult;
use crate::PosApp;

impl<B: SheetBackend> PosApp<B> {
    /// Report for `period` (`YYYY-MM`) using the configured profit method.
    pub fn financial_report(&self, period: &str) -> ApiResult<FinancialReport> {
        let period = validate_period(period)?;
        self.financial_report_with(period, self.config.profit_method())
    }

    /// Report for the month containing today.
    pub fn current_report(&self) -> ApiResult<FinancialReport> {
        self.financial_report_with(Period::current(), self.config.profit_method())
    }

    /// Report with an explicit profit method, for side-by-side comparison.
    pub fn financial_report_with(
        &self,
        period: Period,
        method: ProfitMethod,
    ) -> ApiResult<FinancialReport> {
        self.require_view(View::Reports)?;
        let snapshot = self.snapshot.current();
        debug!(%period, %method, version = snapshot.version, "financial_report");

        Ok(self
            .reports
            .get_or_compute(snapshot.version, period, method, || {
                FinancialReport::compute(&snapshot.ledger, &snapshot.inventory, &period, method)
            }))
    }
}
