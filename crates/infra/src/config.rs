//! Environment-driven forecast settings.

use anyhow::{Context, bail};

use finback_forecast::{ForecastConfig, ForecastMethodKind, SeriesType};

pub const ZERO_FILL_GAPS_VAR: &str = "FORECAST_ZERO_FILL_GAPS";
pub const DEFAULT_HISTORICAL_MONTHS_VAR: &str = "FORECAST_DEFAULT_HISTORICAL_MONTHS";
pub const DEFAULT_FORECAST_MONTHS_VAR: &str = "FORECAST_DEFAULT_FORECAST_MONTHS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastSettings {
    /// Insert explicit zero months where the ledger had no activity.
    pub zero_fill_gaps: bool,
    pub default_historical_months: u32,
    pub default_forecast_months: u32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            zero_fill_gaps: true,
            default_historical_months: 12,
            default_forecast_months: 6,
        }
    }
}

impl ForecastSettings {
    /// Read settings from the process environment; unset variables keep
    /// their defaults, malformed ones are errors.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ZERO_FILL_GAPS_VAR) {
            settings.zero_fill_gaps =
                parse_bool(&raw).with_context(|| format!("{ZERO_FILL_GAPS_VAR}={raw:?}"))?;
        }
        if let Some(raw) = lookup(DEFAULT_HISTORICAL_MONTHS_VAR) {
            settings.default_historical_months = raw
                .trim()
                .parse()
                .with_context(|| format!("{DEFAULT_HISTORICAL_MONTHS_VAR}={raw:?} is not a month count"))?;
        }
        if let Some(raw) = lookup(DEFAULT_FORECAST_MONTHS_VAR) {
            settings.default_forecast_months = raw
                .trim()
                .parse()
                .with_context(|| format!("{DEFAULT_FORECAST_MONTHS_VAR}={raw:?} is not a month count"))?;
        }

        settings
            .config_for(SeriesType::Revenue, ForecastMethodKind::Linear)
            .validate()
            .context("default forecast horizon is out of range")?;

        Ok(settings)
    }

    /// Config using the default horizons.
    pub fn config_for(&self, series_type: SeriesType, method: ForecastMethodKind) -> ForecastConfig {
        ForecastConfig::new(series_type, method)
            .with_historical_months(self.default_historical_months)
            .with_forecast_months(self.default_forecast_months)
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}
