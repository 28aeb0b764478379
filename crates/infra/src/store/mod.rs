//! Tenant-isolated storage.

pub mod forecast_store;
pub mod tenant_store;

pub use forecast_store::{ForecastStore, InMemoryForecastStore};
pub use tenant_store::{InMemoryTenantStore, TenantStore};
