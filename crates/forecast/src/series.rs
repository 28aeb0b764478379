//! Monthly historical series as handed to the engine.

use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One calendar month of pre-aggregated activity.
///
/// `month` is always the first instant of the month (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDataPoint {
    pub month: DateTime<Utc>,
    pub value: f64,
}

impl MonthlyDataPoint {
    /// Build a point, normalising `month` to the start of its calendar month.
    pub fn new(month: DateTime<Utc>, value: f64) -> Self {
        Self {
            month: month_start(month),
            value,
        }
    }

    /// Build a point from a year and 1-based month number.
    pub fn for_month(year: i32, month: u32, value: f64) -> Option<Self> {
        let month = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
        Some(Self { month, value })
    }
}

/// First instant (UTC) of the calendar month containing `ts`.
pub fn month_start(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(ts.year(), ts.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(ts)
}

/// `month` advanced by `n` calendar months. `None` only on calendar overflow.
pub fn add_months(month: DateTime<Utc>, n: u32) -> Option<DateTime<Utc>> {
    month_start(month).checked_add_months(Months::new(n))
}

/// Index of a month on a continuous month axis (year * 12 + month0).
pub fn month_ordinal(month: DateTime<Utc>) -> i64 {
    i64::from(month.year()) * 12 + i64::from(month.month0())
}

pub fn values(series: &[MonthlyDataPoint]) -> Vec<f64> {
    series.iter().map(|p| p.value).collect()
}

/// True when every month is strictly later than the one before it.
pub fn is_strictly_ascending(series: &[MonthlyDataPoint]) -> bool {
    series
        .windows(2)
        .all(|w| month_ordinal(w[0].month) < month_ordinal(w[1].month))
}

/// Insert explicit zero months wherever the series skips a calendar month.
///
/// Series providers that group ledger activity by month drop months with no
/// matching entries. The regression treats every point as one time step, so
/// the gaps must be materialised before the series reaches the engine.
/// Repeated months are merged by summing their values.
pub fn fill_month_gaps(series: &[MonthlyDataPoint]) -> Vec<MonthlyDataPoint> {
    let mut out: Vec<MonthlyDataPoint> = Vec::with_capacity(series.len());

    for point in series {
        let point = MonthlyDataPoint::new(point.month, point.value);

        if let Some(last) = out.last_mut() {
            let last_ord = month_ordinal(last.month);
            let ord = month_ordinal(point.month);

            if ord == last_ord {
                last.value += point.value;
                continue;
            }

            let mut cursor = last.month;
            for _ in (last_ord + 1)..ord {
                match add_months(cursor, 1) {
                    Some(next) => {
                        out.push(MonthlyDataPoint::new(next, 0.0));
                        cursor = next;
                    }
                    None => break,
                }
            }
        }

        out.push(point);
    }

    out
}
