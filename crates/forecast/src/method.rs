//! Point-prediction strategies.
//!
//! Each variant is a free function over `(values, trend, step)`; `step` is
//! 1-based (1 = the month right after the last historical month). Every
//! prediction is clamped to be non-negative.

use serde::{Deserialize, Serialize};

use crate::config::{ForecastConfig, ForecastMethodKind, GROWTH_RATE_ASSUMPTION};
use crate::stats::mean;
use crate::trend::TrendLine;

/// Weighted moving average looks back at most this many points.
const WMA_WINDOW: usize = 3;

/// Share of the trend slope blended into the average-based methods.
const TREND_NUDGE: f64 = 0.1;

const SEASON_LENGTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastMethod {
    Linear,
    Exponential,
    WeightedAverage,
    Seasonal,
    /// Compounds the last value by a caller-supplied monthly growth percentage.
    Manual { growth_rate_pct: f64 },
}

impl ForecastMethod {
    pub fn from_config(config: &ForecastConfig) -> Self {
        match config.method {
            ForecastMethodKind::Linear => Self::Linear,
            ForecastMethodKind::Exponential => Self::Exponential,
            ForecastMethodKind::WeightedAverage => Self::WeightedAverage,
            ForecastMethodKind::Seasonal => Self::Seasonal,
            ForecastMethodKind::Manual => Self::Manual {
                growth_rate_pct: config.assumption(GROWTH_RATE_ASSUMPTION).unwrap_or(0.0),
            },
        }
    }

    pub fn kind(&self) -> ForecastMethodKind {
        match self {
            Self::Linear => ForecastMethodKind::Linear,
            Self::Exponential => ForecastMethodKind::Exponential,
            Self::WeightedAverage => ForecastMethodKind::WeightedAverage,
            Self::Seasonal => ForecastMethodKind::Seasonal,
            Self::Manual { .. } => ForecastMethodKind::Manual,
        }
    }

    pub fn predict(&self, values: &[f64], trend: &TrendLine, step: usize) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let raw = match self {
            Self::Linear => linear(values, trend, step),
            Self::Exponential => exponential(values, step),
            Self::WeightedAverage => weighted_average(values, trend, step),
            Self::Seasonal => seasonal(values, trend, step),
            Self::Manual { growth_rate_pct } => manual(values, *growth_rate_pct, step),
        };

        raw.max(0.0)
    }
}

/// Average per-step growth between the first and last value.
///
/// Zero when the series starts at zero or has fewer than two points.
pub fn overall_growth_rate(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let first = values[0];
    if first == 0.0 {
        return 0.0;
    }
    (values[n - 1] - first) / first / ((n - 1) as f64)
}

/// Straight extrapolation of the fitted line.
pub fn linear(values: &[f64], trend: &TrendLine, step: usize) -> f64 {
    trend.at((values.len() + step - 1) as f64)
}

pub fn exponential(values: &[f64], step: usize) -> f64 {
    let last = values.last().copied().unwrap_or(0.0);
    last * (1.0 + overall_growth_rate(values)).powi(exponent(step))
}

/// Linearly weighted average of the last three values, nudged by the trend.
pub fn weighted_average(values: &[f64], trend: &TrendLine, step: usize) -> f64 {
    let window = &values[values.len().saturating_sub(WMA_WINDOW)..];

    let mut weighted = 0.0;
    let mut weights = 0.0;
    for (i, v) in window.iter().enumerate() {
        let w = (i + 1) as f64;
        weighted += v * w;
        weights += w;
    }
    if weights == 0.0 {
        return 0.0;
    }

    (weighted / weights) * (1.0 + trend.slope * step as f64 * TREND_NUDGE)
}

/// Same month last year when available, otherwise the historical mean.
pub fn seasonal(values: &[f64], trend: &TrendLine, step: usize) -> f64 {
    let target = values.len() + step - 1;
    let base = target
        .checked_sub(SEASON_LENGTH)
        .and_then(|i| values.get(i).copied())
        .unwrap_or_else(|| mean(values));

    base * (1.0 + trend.slope * TREND_NUDGE)
}

pub fn manual(values: &[f64], growth_rate_pct: f64, step: usize) -> f64 {
    let last = values.last().copied().unwrap_or(0.0);
    last * (1.0 + growth_rate_pct / 100.0).powi(exponent(step))
}

fn exponent(step: usize) -> i32 {
    i32::try_from(step).unwrap_or(i32::MAX)
}
