//! `finback-forecast`
//!
//! **Responsibility:** monthly forecast generation for revenue, expense, and
//! ledger-account series.
//!
//! Everything in this crate is pure computation:
//! - It does not fetch history; callers hand in an already-materialised series.
//! - It does not persist results; callers store the returned [`Forecast`].
//! - The same `(config, series)` always produces the same [`ForecastResult`].

pub mod accuracy;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod job;
pub mod method;
pub mod result;
pub mod scheduler;
pub mod series;
pub mod stats;
pub mod trend;

pub use accuracy::Backtest;
pub use confidence::ConfidenceBand;
pub use config::{ForecastConfig, ForecastMethodKind, RetrainParams, SeriesType};
pub use engine::{ForecastEngine, MIN_HISTORY_POINTS};
pub use error::ForecastError;
pub use forecast::Forecast;
pub use job::{AnalyticsJob, ForecastJob, RetrainJob};
pub use method::ForecastMethod;
pub use result::{Confidence, ForecastDataPoint, ForecastResult, Seasonality, Trend};
pub use scheduler::{JobScheduler, LocalScheduler, TenantScope};
pub use series::MonthlyDataPoint;
pub use trend::TrendLine;
