//! `finback-infra`: boundary adapters around the forecast engine.
//!
//! Series fetching, tenant-isolated storage, configuration, and the
//! `ForecastService` that wires them to the (pure) engine.

pub mod config;
pub mod series_provider;
pub mod service;
pub mod store;

pub use config::ForecastSettings;
pub use series_provider::{HistoricalSeriesProvider, LedgerSeriesProvider, SeriesProviderError};
pub use service::{ForecastService, ServiceError};
pub use store::{ForecastStore, InMemoryForecastStore, InMemoryTenantStore, TenantStore};
