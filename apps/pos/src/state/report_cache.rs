//! # Report Cache
//!
//! Memo for [`FinancialReport`], keyed by snapshot version, period and
//! profit method.
//!
//! ```text
//! (version 7, 2024-05, net_worth) ──► hit  ──► clone
//!                                 └─► miss ──► compute, drop entries
//!                                              of older versions, store
//! ```
//!
//! A refresh bumps the version, so stale reports are never served.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::trace;

use amsa_core::{FinancialReport, Period, ProfitMethod};

type Key = (u64, Period, ProfitMethod);

#[derive(Debug, Default)]
pub struct ReportCache {
    entries: Mutex<HashMap<Key, FinancialReport>>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached report for the key, computing it on a miss.
    pub fn get_or_compute<F>(
        &self,
        version: u64,
        period: Period,
        method: ProfitMethod,
        compute: F,
    ) -> FinancialReport
    where
        F: FnOnce() -> FinancialReport,
    {
        let key = (version, period, method);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(report) = entries.get(&key) {
            trace!(version, %period, %method, "Report cache hit");
            return report.clone();
        }

        let report = compute();
        entries.retain(|(v, _, _), _| *v == version);
        entries.insert(key, report.clone());
        report
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(period: Period, method: ProfitMethod) -> FinancialReport {
        FinancialReport::compute(&[], &[], &period, method)
    }

    #[test]
    fn test_hit_skips_compute() {
        let cache = ReportCache::new();
        let may: Period = "2024-05".parse().unwrap();

        cache.get_or_compute(1, may, ProfitMethod::NetWorth, || {
            report(may, ProfitMethod::NetWorth)
        });
        let mut called = false;
        cache.get_or_compute(1, may, ProfitMethod::NetWorth, || {
            called = true;
            report(may, ProfitMethod::NetWorth)
        });
        assert!(!called);
    }

    #[test]
    fn test_new_version_evicts_old() {
        let cache = ReportCache::new();
        let may: Period = "2024-05".parse().unwrap();
        let june: Period = "2024-06".parse().unwrap();

        cache.get_or_compute(1, may, ProfitMethod::NetWorth, || {
            report(may, ProfitMethod::NetWorth)
        });
        cache.get_or_compute(1, june, ProfitMethod::CashFlow, || {
            report(june, ProfitMethod::CashFlow)
        });
        assert_eq!(cache.len(), 2);

        cache.get_or_compute(2, may, ProfitMethod::NetWorth, || {
            report(may, ProfitMethod::NetWorth)
        });
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
