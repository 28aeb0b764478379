//! Historical series sources.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use finback_core::{DomainResult, TenantId};
use finback_forecast::SeriesType;
use finback_forecast::series::{MonthlyDataPoint, fill_month_gaps};
use finback_ledger::{LedgerEntry, LookbackWindow, MonthlyAggregator};

use crate::config::ForecastSettings;
use crate::store::TenantStore;

#[derive(Debug, Error)]
pub enum SeriesProviderError {
    #[error("invalid series request: {0}")]
    InvalidRequest(String),

    #[error("series source unavailable: {0}")]
    Unavailable(String),
}

/// Async source of monthly history for a tenant.
///
/// Returned points are ascending by month; each value is the month's
/// aggregated amount in the tenant's reporting currency.
#[async_trait::async_trait]
pub trait HistoricalSeriesProvider: Send + Sync {
    async fn fetch_historical_series(
        &self,
        tenant_id: TenantId,
        series_type: SeriesType,
        lookback_months: u32,
        account_ref: Option<&str>,
    ) -> Result<Vec<MonthlyDataPoint>, SeriesProviderError>;
}

/// Series provider over stored ledger entries.
///
/// The lookback window ends at the clock's current month. With
/// `zero_fill_gaps` on, months without activity between the first and last
/// active month are returned as explicit zeros.
#[derive(Debug)]
pub struct LedgerSeriesProvider<S> {
    entries: S,
    aggregator: MonthlyAggregator,
    zero_fill_gaps: bool,
    clock: fn() -> DateTime<Utc>,
}

impl<S> LedgerSeriesProvider<S>
where
    S: TenantStore<Uuid, LedgerEntry>,
{
    pub fn new(entries: S) -> Self {
        Self {
            entries,
            aggregator: MonthlyAggregator,
            zero_fill_gaps: true,
            clock: Utc::now,
        }
    }

    pub fn from_settings(entries: S, settings: &ForecastSettings) -> Self {
        Self::new(entries).with_zero_fill(settings.zero_fill_gaps)
    }

    pub fn with_zero_fill(mut self, zero_fill_gaps: bool) -> Self {
        self.zero_fill_gaps = zero_fill_gaps;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate and store a ledger entry under its tenant.
    pub fn record(&self, entry: LedgerEntry) -> DomainResult<()> {
        entry.validate()?;
        self.entries.upsert(entry.tenant_id, entry.entry_id, entry);
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S> HistoricalSeriesProvider for LedgerSeriesProvider<S>
where
    S: TenantStore<Uuid, LedgerEntry>,
{
    async fn fetch_historical_series(
        &self,
        tenant_id: TenantId,
        series_type: SeriesType,
        lookback_months: u32,
        account_ref: Option<&str>,
    ) -> Result<Vec<MonthlyDataPoint>, SeriesProviderError> {
        if lookback_months == 0 {
            return Err(SeriesProviderError::InvalidRequest(
                "lookback_months must be positive".to_string(),
            ));
        }
        if series_type == SeriesType::Account && account_ref.is_none() {
            return Err(SeriesProviderError::InvalidRequest(
                "account series require an account reference".to_string(),
            ));
        }

        let window = LookbackWindow::ending_at((self.clock)(), lookback_months);
        let entries = self.entries.list(tenant_id);
        let raw = self
            .aggregator
            .aggregate(&entries, series_type, account_ref, window);

        let series = if self.zero_fill_gaps {
            fill_month_gaps(&raw)
        } else {
            raw
        };

        debug!(
            tenant = %tenant_id,
            series_type = ?series_type,
            lookback_months,
            points = series.len(),
            "historical series fetched"
        );

        Ok(series)
    }
}
