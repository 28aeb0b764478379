//! Forecast runs packaged as tenant-owned jobs.
//!
//! A job owns the snapshot it computes over (config plus an already-fetched
//! series) and returns a new [`Forecast`]. Storing it is the caller's concern.

use chrono::{DateTime, Utc};

use finback_core::{ForecastId, TenantId};

use crate::config::{ForecastConfig, RetrainParams};
use crate::engine::ForecastEngine;
use crate::error::ForecastError;
use crate::forecast::Forecast;
use crate::series::MonthlyDataPoint;

pub trait AnalyticsJob: Send + Sync + 'static {
    type Output;

    /// Tenant whose data the job reads.
    fn tenant_id(&self) -> TenantId;

    fn run(&self) -> Result<Self::Output, ForecastError>;
}

/// First training of a new forecast.
#[derive(Debug, Clone)]
pub struct ForecastJob {
    tenant_id: TenantId,
    forecast_id: ForecastId,
    config: ForecastConfig,
    series: Vec<MonthlyDataPoint>,
    trained_at: DateTime<Utc>,
    engine: ForecastEngine,
}

impl ForecastJob {
    pub fn new(
        tenant_id: TenantId,
        forecast_id: ForecastId,
        config: ForecastConfig,
        series: Vec<MonthlyDataPoint>,
        trained_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant_id,
            forecast_id,
            config,
            series,
            trained_at,
            engine: ForecastEngine::new(),
        }
    }

    pub fn with_engine(mut self, engine: ForecastEngine) -> Self {
        self.engine = engine;
        self
    }
}

impl AnalyticsJob for ForecastJob {
    type Output = Forecast;

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn run(&self) -> Result<Forecast, ForecastError> {
        self.engine.create(
            self.tenant_id,
            self.forecast_id,
            self.config.clone(),
            &self.series,
            self.trained_at,
        )
    }
}

/// Re-run of a stored forecast with updated parameters.
#[derive(Debug, Clone)]
pub struct RetrainJob {
    existing: Forecast,
    params: RetrainParams,
    series: Vec<MonthlyDataPoint>,
    trained_at: DateTime<Utc>,
    engine: ForecastEngine,
}

impl RetrainJob {
    pub fn new(
        existing: Forecast,
        params: RetrainParams,
        series: Vec<MonthlyDataPoint>,
        trained_at: DateTime<Utc>,
    ) -> Self {
        Self {
            existing,
            params,
            series,
            trained_at,
            engine: ForecastEngine::new(),
        }
    }

    pub fn with_engine(mut self, engine: ForecastEngine) -> Self {
        self.engine = engine;
        self
    }
}

impl AnalyticsJob for RetrainJob {
    type Output = Forecast;

    fn tenant_id(&self) -> TenantId {
        self.existing.tenant_id
    }

    fn run(&self) -> Result<Forecast, ForecastError> {
        self.engine
            .retrain(&self.existing, &self.params, &self.series, self.trained_at)
    }
}
