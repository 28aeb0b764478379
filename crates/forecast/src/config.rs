//! Forecast run configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

pub const MAX_HISTORICAL_MONTHS: u32 = 120;
pub const MAX_FORECAST_MONTHS: u32 = 60;

/// Assumption key read by the manual method (percent per month).
pub const GROWTH_RATE_ASSUMPTION: &str = "growthRate";

/// Which ledger activity a series aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesType {
    Revenue,
    Expense,
    /// A single ledger account, identified by `ForecastConfig::account_ref`.
    Account,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethodKind {
    Linear,
    Exponential,
    WeightedAverage,
    Seasonal,
    Manual,
}

/// Parameters of one forecast run. Treated as immutable once a run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub series_type: SeriesType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_ref: Option<String>,
    pub historical_months: u32,
    pub forecast_months: u32,
    pub method: ForecastMethodKind,
    #[serde(default)]
    pub custom_assumptions: BTreeMap<String, f64>,
}

/// Overrides applied to an existing config when a forecast is retrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrainParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ForecastMethodKind>,
}

impl ForecastConfig {
    /// 12 months of history, 6 months ahead.
    pub fn new(series_type: SeriesType, method: ForecastMethodKind) -> Self {
        Self {
            series_type,
            account_ref: None,
            historical_months: 12,
            forecast_months: 6,
            method,
            custom_assumptions: BTreeMap::new(),
        }
    }

    pub fn with_account(mut self, account_ref: impl Into<String>) -> Self {
        self.account_ref = Some(account_ref.into());
        self
    }

    pub fn with_historical_months(mut self, months: u32) -> Self {
        self.historical_months = months;
        self
    }

    pub fn with_forecast_months(mut self, months: u32) -> Self {
        self.forecast_months = months;
        self
    }

    pub fn with_assumption(mut self, key: impl Into<String>, value: f64) -> Self {
        self.custom_assumptions.insert(key.into(), value);
        self
    }

    pub fn assumption(&self, key: &str) -> Option<f64> {
        self.custom_assumptions.get(key).copied()
    }

    /// Copy of this config with the retrain overrides applied.
    pub fn with_params(&self, params: &RetrainParams) -> Self {
        let mut next = self.clone();
        if let Some(m) = params.historical_months {
            next.historical_months = m;
        }
        if let Some(m) = params.forecast_months {
            next.forecast_months = m;
        }
        if let Some(method) = params.method {
            next.method = method;
        }
        next
    }

    /// Caller-side validation; the engine runs it again before computing.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !(3..=MAX_HISTORICAL_MONTHS).contains(&self.historical_months) {
            return Err(ForecastError::invalid_config(format!(
                "historical_months must be between 3 and {MAX_HISTORICAL_MONTHS} (got {})",
                self.historical_months
            )));
        }

        if !(1..=MAX_FORECAST_MONTHS).contains(&self.forecast_months) {
            return Err(ForecastError::invalid_config(format!(
                "forecast_months must be between 1 and {MAX_FORECAST_MONTHS} (got {})",
                self.forecast_months
            )));
        }

        if self.series_type == SeriesType::Account
            && self.account_ref.as_deref().is_none_or(|r| r.trim().is_empty())
        {
            return Err(ForecastError::invalid_config(
                "account series require an account_ref",
            ));
        }

        if let Some((key, _)) = self.custom_assumptions.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ForecastError::invalid_config(format!(
                "custom assumption '{key}' must be a finite number"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ForecastConfig::new(SeriesType::Revenue, ForecastMethodKind::Linear)
            .validate()
            .unwrap();
    }

    #[test]
    fn history_below_three_months_is_rejected() {
        let cfg = ForecastConfig::new(SeriesType::Expense, ForecastMethodKind::Linear)
            .with_historical_months(2);
        assert!(matches!(cfg.validate(), Err(ForecastError::InvalidConfig(_))));
    }

    #[test]
    fn zero_forecast_months_is_rejected() {
        let cfg = ForecastConfig::new(SeriesType::Expense, ForecastMethodKind::Linear)
            .with_forecast_months(0);
        assert!(matches!(cfg.validate(), Err(ForecastError::InvalidConfig(_))));
    }

    #[test]
    fn account_series_need_a_reference() {
        let cfg = ForecastConfig::new(SeriesType::Account, ForecastMethodKind::Seasonal);
        assert!(cfg.validate().is_err());
        assert!(cfg.clone().with_account("  ").validate().is_err());
        cfg.with_account("4000").validate().unwrap();
    }

    #[test]
    fn non_finite_assumptions_are_rejected() {
        let cfg = ForecastConfig::new(SeriesType::Revenue, ForecastMethodKind::Manual)
            .with_assumption(GROWTH_RATE_ASSUMPTION, f64::NAN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn retrain_params_override_only_given_fields() {
        let cfg = ForecastConfig::new(SeriesType::Revenue, ForecastMethodKind::Linear)
            .with_assumption(GROWTH_RATE_ASSUMPTION, 5.0);
        let next = cfg.with_params(&RetrainParams {
            forecast_months: Some(3),
            method: Some(ForecastMethodKind::Manual),
            ..RetrainParams::default()
        });

        assert_eq!(next.historical_months, 12);
        assert_eq!(next.forecast_months, 3);
        assert_eq!(next.method, ForecastMethodKind::Manual);
        assert_eq!(next.assumption(GROWTH_RATE_ASSUMPTION), Some(5.0));
    }

    #[test]
    fn method_kinds_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&ForecastMethodKind::WeightedAverage).unwrap();
        assert_eq!(json, "\"weighted_average\"");
    }
}
