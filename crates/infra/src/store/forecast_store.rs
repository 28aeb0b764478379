use finback_core::{ForecastId, TenantId};
use finback_forecast::Forecast;

use super::tenant_store::{InMemoryTenantStore, TenantStore};

/// Persistence boundary for forecasts.
///
/// Saving a forecast whose id already exists replaces it (last writer wins).
pub trait ForecastStore: Send + Sync {
    fn get(&self, tenant_id: TenantId, id: ForecastId) -> Option<Forecast>;
    fn save(&self, forecast: Forecast);
    /// All forecasts of a tenant, oldest id first.
    fn list(&self, tenant_id: TenantId) -> Vec<Forecast>;
}

/// In-memory forecast store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryForecastStore {
    inner: InMemoryTenantStore<ForecastId, Forecast>,
}

impl InMemoryForecastStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForecastStore for InMemoryForecastStore {
    fn get(&self, tenant_id: TenantId, id: ForecastId) -> Option<Forecast> {
        self.inner.get(tenant_id, &id)
    }

    fn save(&self, forecast: Forecast) {
        self.inner.upsert(forecast.tenant_id, forecast.id, forecast);
    }

    fn list(&self, tenant_id: TenantId) -> Vec<Forecast> {
        self.inner.list(tenant_id)
    }
}
