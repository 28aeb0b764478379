//! Forecast service: fetch history, run the engine, persist the result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use finback_core::{ForecastId, TenantId};
use finback_forecast::{
    Forecast, ForecastConfig, ForecastEngine, ForecastError, ForecastJob, JobScheduler,
    LocalScheduler, MonthlyDataPoint, RetrainJob, RetrainParams, TenantScope,
};

use crate::series_provider::{HistoricalSeriesProvider, SeriesProviderError};
use crate::store::ForecastStore;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Provider(#[from] SeriesProviderError),

    #[error("forecast {0} not found")]
    NotFound(ForecastId),
}

/// Entry point used by outer layers (HTTP handlers, workers).
///
/// Every run goes through a [`LocalScheduler`]; requests for tenants outside
/// its scope fail with `TenantScopeViolation` before history is fetched.
/// The engine itself is synchronous; the only await point is the series
/// fetch, which completes before any computation starts. Concurrent retrains
/// of one forecast race at `ForecastStore::save` and the last write wins.
pub struct ForecastService<P, S> {
    provider: Arc<P>,
    store: Arc<S>,
    scheduler: LocalScheduler,
    engine: ForecastEngine,
    clock: fn() -> DateTime<Utc>,
}

impl<P, S> ForecastService<P, S>
where
    P: HistoricalSeriesProvider,
    S: ForecastStore,
{
    pub fn new(provider: Arc<P>, store: Arc<S>) -> Self {
        Self {
            provider,
            store,
            scheduler: LocalScheduler::default(),
            engine: ForecastEngine::new(),
            clock: Utc::now,
        }
    }

    /// Restrict the service to one tenant (or open it back up with `Shared`).
    pub fn with_scope(mut self, scope: TenantScope) -> Self {
        self.scheduler = LocalScheduler::new(scope);
        self
    }

    /// Override the source of `last_trained_at`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Generate and store a new forecast.
    #[instrument(
        name = "forecast.generate",
        skip(self, config),
        fields(
            tenant_id = %tenant_id,
            series_type = ?config.series_type,
            method = ?config.method
        ),
        err
    )]
    pub async fn generate(
        &self,
        tenant_id: TenantId,
        config: ForecastConfig,
    ) -> Result<Forecast, ServiceError> {
        self.scheduler.admit(tenant_id)?;
        config.validate()?;
        let series = self.fetch(tenant_id, &config).await?;

        let job = ForecastJob::new(tenant_id, ForecastId::new(), config, series, (self.clock)())
            .with_engine(self.engine);
        let forecast = self.scheduler.run(job)?;

        self.store.save(forecast.clone());
        info!(
            forecast_id = %forecast.id,
            total_forecast = forecast.result.total_forecast,
            accuracy = forecast.result.accuracy,
            "forecast stored"
        );
        Ok(forecast)
    }

    /// Recompute an existing forecast with updated parameters.
    ///
    /// The stored forecast keeps its id; it is only replaced on success.
    #[instrument(
        name = "forecast.retrain",
        skip(self, params),
        fields(tenant_id = %tenant_id, forecast_id = %id),
        err
    )]
    pub async fn retrain(
        &self,
        tenant_id: TenantId,
        id: ForecastId,
        params: RetrainParams,
    ) -> Result<Forecast, ServiceError> {
        self.scheduler.admit(tenant_id)?;
        let existing = self
            .store
            .get(tenant_id, id)
            .ok_or(ServiceError::NotFound(id))?;

        let next_config = existing.config.with_params(&params);
        next_config.validate()?;
        let series = self.fetch(tenant_id, &next_config).await?;

        let job = RetrainJob::new(existing, params, series, (self.clock)()).with_engine(self.engine);
        let retrained = self.scheduler.run(job)?;

        self.store.save(retrained.clone());
        info!(
            version = retrained.version,
            total_forecast = retrained.result.total_forecast,
            "forecast retrained"
        );
        Ok(retrained)
    }

    pub fn get(&self, tenant_id: TenantId, id: ForecastId) -> Result<Forecast, ServiceError> {
        self.store.get(tenant_id, id).ok_or(ServiceError::NotFound(id))
    }

    pub fn list(&self, tenant_id: TenantId) -> Vec<Forecast> {
        self.store.list(tenant_id)
    }

    async fn fetch(
        &self,
        tenant_id: TenantId,
        config: &ForecastConfig,
    ) -> Result<Vec<MonthlyDataPoint>, SeriesProviderError> {
        self.provider
            .fetch_historical_series(
                tenant_id,
                config.series_type,
                config.historical_months,
                config.account_ref.as_deref(),
            )
            .await
            .inspect_err(|e| warn!(error = %e, "historical series fetch failed"))
    }
}
