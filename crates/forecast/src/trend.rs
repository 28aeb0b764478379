//! Ordinary-least-squares trend over a historical series.
//!
//! The x axis is the point index, not the calendar month: a series with
//! missing months is regressed as if it were contiguous.

use serde::{Deserialize, Serialize};

use crate::result::{Seasonality, Trend};

/// Slopes within ±0.05 per step are reported as stable.
pub const TREND_THRESHOLD: f64 = 0.05;

/// Minimum number of points for seasonality to be reported.
pub const SEASONALITY_MIN_POINTS: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// Closed-form OLS fit with `x = 0..n-1`.
    ///
    /// Falls back to the flat zero line when the fit is degenerate (fewer than
    /// two points) or any input is NaN.
    pub fn fit(values: &[f64]) -> Self {
        let n = values.len();
        if n < 2 || values.iter().any(|v| v.is_nan()) {
            return Self::default();
        }

        let nf = n as f64;
        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
        for (i, y) in values.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let denominator = nf * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            return Self::default();
        }

        let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / nf;

        if !(slope.is_finite() && intercept.is_finite()) {
            return Self::default();
        }

        Self { slope, intercept }
    }

    /// Value of the fitted line at step `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    pub fn classify(&self) -> Trend {
        if self.slope > TREND_THRESHOLD {
            Trend::Increasing
        } else if self.slope < -TREND_THRESHOLD {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }
}

/// Presence heuristic: a full year of history counts as seasonal.
pub fn detect_seasonality(points: usize) -> Seasonality {
    if points >= SEASONALITY_MIN_POINTS {
        Seasonality::Detected
    } else {
        Seasonality::NotDetected
    }
}
