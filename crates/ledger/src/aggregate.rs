//! Ledger entries → monthly series.

use std::collections::BTreeMap;

use chrono::{DateTime, Months, Utc};

use finback_forecast::SeriesType;
use finback_forecast::series::{MonthlyDataPoint, month_ordinal, month_start};

use crate::ledger::LedgerEntry;

/// Inclusive range of calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LookbackWindow {
    /// The `months` calendar months ending with (and including) the month of
    /// `as_of`. At least one month is always covered.
    pub fn ending_at(as_of: DateTime<Utc>, months: u32) -> Self {
        let end = month_start(as_of);
        let start = end
            .checked_sub_months(Months::new(months.max(1) - 1))
            .unwrap_or(end);
        Self { start, end }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        let ord = month_ordinal(ts);
        month_ordinal(self.start) <= ord && ord <= month_ordinal(self.end)
    }
}

/// Groups ledger activity by calendar month.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Sum matching entries per month inside `window`.
    ///
    /// Amounts are converted from minor to major currency units. Months with
    /// no matching entries are omitted, so the result may have gaps; callers
    /// that regress over it should fill them first.
    pub fn aggregate<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a LedgerEntry>,
        series_type: SeriesType,
        account_ref: Option<&str>,
        window: LookbackWindow,
    ) -> Vec<MonthlyDataPoint> {
        let mut months: BTreeMap<i64, (DateTime<Utc>, i128)> = BTreeMap::new();

        for entry in entries {
            if !window.contains(entry.occurred_at) {
                continue;
            }
            let Some(amount) = entry.signed_amount_for(series_type, account_ref) else {
                continue;
            };

            let slot = months
                .entry(month_ordinal(entry.occurred_at))
                .or_insert((month_start(entry.occurred_at), 0));
            slot.1 += i128::from(amount);
        }

        months
            .into_values()
            .map(|(month, cents)| MonthlyDataPoint::new(month, cents as f64 / 100.0))
            .collect()
    }
}
