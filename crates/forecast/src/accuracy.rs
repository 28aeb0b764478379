//! In-sample backtest of the fitted trend line.
//!
//! The line is scored against the same history it was fitted on, so the
//! reported accuracy describes fit quality, not out-of-sample skill.

use serde::{Deserialize, Serialize};

use crate::trend::TrendLine;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Backtest {
    /// Mean absolute percentage error, in percent.
    pub mape: f64,
    pub rmse: f64,
    /// `max(0, 100 - mape)`.
    pub accuracy: f64,
}

pub fn evaluate(values: &[f64], trend: &TrendLine) -> Backtest {
    if values.is_empty() {
        return Backtest {
            mape: 0.0,
            rmse: 0.0,
            accuracy: 100.0,
        };
    }

    let mut pct_error_sum = 0.0;
    let mut pct_terms = 0usize;
    let mut sq_error_sum = 0.0;

    for (i, actual) in values.iter().enumerate() {
        let residual = actual - trend.at(i as f64);
        sq_error_sum += residual * residual;

        // Zero actuals have no defined percentage error.
        if *actual != 0.0 {
            pct_error_sum += (residual / actual).abs();
            pct_terms += 1;
        }
    }

    let mape = if pct_terms == 0 {
        0.0
    } else {
        pct_error_sum / pct_terms as f64 * 100.0
    };
    let rmse = (sq_error_sum / values.len() as f64).sqrt();

    Backtest {
        mape,
        rmse,
        accuracy: (100.0 - mape).max(0.0),
    }
}
