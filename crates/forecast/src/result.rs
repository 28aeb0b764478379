use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seasonality {
    Detected,
    NotDetected,
}

/// One month of a forecast.
///
/// Historical months carry `actual` and a zero-width band; projected months
/// have no `actual`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDataPoint {
    pub period: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    pub predicted: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence: Confidence,
}

impl ForecastDataPoint {
    pub fn historical(period: DateTime<Utc>, actual: f64) -> Self {
        Self {
            period,
            actual: Some(actual),
            predicted: actual,
            lower_bound: actual,
            upper_bound: actual,
            confidence: Confidence::High,
        }
    }

    pub fn is_projected(&self) -> bool {
        self.actual.is_none()
    }
}

/// Output of one forecast run.
///
/// All monetary values are rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Historical months first, then projected months, ascending by period.
    pub data_points: Vec<ForecastDataPoint>,
    /// In-sample accuracy of the trend line (0-100).
    pub accuracy: f64,
    pub mape: f64,
    pub rmse: f64,
    pub trend: Trend,
    /// Fitted value-per-month slope, unrounded so it agrees with `trend`.
    pub trend_slope: f64,
    pub seasonality: Seasonality,
    pub total_historical: f64,
    pub total_forecast: f64,
    /// Average monthly growth over the history, in percent.
    pub average_growth_rate: f64,
}

impl ForecastResult {
    pub fn historical(&self) -> impl Iterator<Item = &ForecastDataPoint> {
        self.data_points.iter().filter(|p| !p.is_projected())
    }

    pub fn projected(&self) -> impl Iterator<Item = &ForecastDataPoint> {
        self.data_points.iter().filter(|p| p.is_projected())
    }
}
