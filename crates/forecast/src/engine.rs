//! Forecast orchestration: trend fit, projection, bands, backtest, aggregates.

use chrono::{DateTime, Utc};
use tracing::debug;

use finback_core::{ForecastId, TenantId};

use crate::accuracy;
use crate::confidence;
use crate::config::{ForecastConfig, RetrainParams};
use crate::error::ForecastError;
use crate::forecast::Forecast;
use crate::method::{ForecastMethod, overall_growth_rate};
use crate::result::{ForecastDataPoint, ForecastResult};
use crate::series::{self, MonthlyDataPoint};
use crate::stats::{round2, stddev_population};
use crate::trend::{TrendLine, detect_seasonality};

/// Fewest historical months a forecast can be generated from.
pub const MIN_HISTORY_POINTS: usize = 3;

/// Stateless forecast engine.
///
/// Holds no state; construct one wherever it is needed or inject a copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run one forecast over an already-fetched series.
    ///
    /// Only the trailing `config.historical_months` points are used, and they
    /// must be finite, non-negative, and strictly ascending by month. Values
    /// are rounded to 2 decimals once, when the result is assembled; the
    /// trend slope is reported as fitted.
    pub fn generate(
        &self,
        config: &ForecastConfig,
        series: &[MonthlyDataPoint],
    ) -> Result<ForecastResult, ForecastError> {
        config.validate()?;

        let keep = config.historical_months as usize;
        let history = &series[series.len().saturating_sub(keep)..];

        if history.len() < MIN_HISTORY_POINTS {
            return Err(ForecastError::InsufficientHistory {
                required: MIN_HISTORY_POINTS,
                actual: history.len(),
            });
        }
        if !series::is_strictly_ascending(history) {
            return Err(ForecastError::invalid_input(
                "series months must be strictly ascending",
            ));
        }
        if let Some(p) = history.iter().find(|p| !p.value.is_finite()) {
            return Err(ForecastError::invalid_input(format!(
                "non-finite value for month {}",
                p.month.format("%Y-%m")
            )));
        }
        if let Some(p) = history.iter().find(|p| p.value < 0.0) {
            return Err(ForecastError::invalid_input(format!(
                "negative net value {} for month {}",
                p.value,
                p.month.format("%Y-%m")
            )));
        }

        let values = series::values(history);
        let trend = TrendLine::fit(&values);
        let method = ForecastMethod::from_config(config);
        let sigma = stddev_population(&values);
        let last_month = history[history.len() - 1].month;

        let mut data_points: Vec<ForecastDataPoint> =
            Vec::with_capacity(history.len() + config.forecast_months as usize);

        for p in history {
            data_points.push(ForecastDataPoint::historical(p.month, round2(p.value)));
        }

        let mut total_forecast = 0.0;
        for step in 1..=config.forecast_months {
            let predicted = method.predict(&values, &trend, step as usize);
            let band = confidence::estimate(predicted, sigma, step as usize);
            let period = series::add_months(last_month, step).ok_or_else(|| {
                ForecastError::invalid_input("forecast period overflows the calendar")
            })?;

            total_forecast += predicted;
            data_points.push(ForecastDataPoint {
                period,
                actual: None,
                predicted: round2(predicted),
                lower_bound: round2(band.lower_bound),
                upper_bound: round2(band.upper_bound),
                confidence: band.confidence,
            });
        }

        let backtest = accuracy::evaluate(&values, &trend);
        let trend_direction = trend.classify();

        debug!(
            method = ?method.kind(),
            historical = history.len(),
            projected = config.forecast_months,
            trend = ?trend_direction,
            slope = trend.slope,
            "forecast generated"
        );

        Ok(ForecastResult {
            data_points,
            accuracy: round2(backtest.accuracy),
            mape: round2(backtest.mape),
            rmse: round2(backtest.rmse),
            trend: trend_direction,
            trend_slope: trend.slope,
            seasonality: detect_seasonality(values.len()),
            total_historical: round2(values.iter().sum()),
            total_forecast: round2(total_forecast),
            average_growth_rate: round2(overall_growth_rate(&values) * 100.0),
        })
    }

    /// First run of a new forecast (`version = 1`).
    pub fn create(
        &self,
        tenant_id: TenantId,
        id: ForecastId,
        config: ForecastConfig,
        series: &[MonthlyDataPoint],
        trained_at: DateTime<Utc>,
    ) -> Result<Forecast, ForecastError> {
        let result = self.generate(&config, series)?;
        Ok(Forecast {
            id,
            tenant_id,
            config,
            result,
            last_trained_at: trained_at,
            version: 1,
        })
    }

    /// Recompute an existing forecast with updated parameters.
    ///
    /// Identity is kept; every derived field is replaced. `existing` is left
    /// untouched when the run fails.
    pub fn retrain(
        &self,
        existing: &Forecast,
        params: &RetrainParams,
        series: &[MonthlyDataPoint],
        trained_at: DateTime<Utc>,
    ) -> Result<Forecast, ForecastError> {
        let config = existing.config.with_params(params);
        let result = self.generate(&config, series)?;

        Ok(Forecast {
            id: existing.id,
            tenant_id: existing.tenant_id,
            config,
            result,
            last_trained_at: trained_at,
            version: existing.version + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ForecastMethodKind, GROWTH_RATE_ASSUMPTION, SeriesType};
    use crate::result::{Confidence, Seasonality, Trend};
    use chrono::TimeZone;
    use finback_core::Entity;
    use proptest::prelude::*;

    const ALL_METHODS: [ForecastMethodKind; 5] = [
        ForecastMethodKind::Linear,
        ForecastMethodKind::Exponential,
        ForecastMethodKind::WeightedAverage,
        ForecastMethodKind::Seasonal,
        ForecastMethodKind::Manual,
    ];

    fn monthly(values: &[f64]) -> Vec<MonthlyDataPoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| MonthlyDataPoint::new(series::add_months(start, i as u32).unwrap(), *v))
            .collect()
    }

    fn config(method: ForecastMethodKind, forecast_months: u32) -> ForecastConfig {
        ForecastConfig::new(SeriesType::Revenue, method).with_forecast_months(forecast_months)
    }

    fn projected(result: &ForecastResult) -> Vec<f64> {
        result.projected().map(|p| p.predicted).collect()
    }

    #[test]
    fn linear_scenario_extends_the_line() {
        let result = ForecastEngine::new()
            .generate(
                &config(ForecastMethodKind::Linear, 2),
                &monthly(&[100.0, 110.0, 120.0, 130.0]),
            )
            .unwrap();

        assert_eq!(result.trend_slope, 10.0);
        assert_eq!(result.trend, Trend::Increasing);
        assert_eq!(projected(&result), vec![140.0, 150.0]);
        assert_eq!(result.total_historical, 460.0);
        assert_eq!(result.total_forecast, 290.0);
        assert_eq!(result.mape, 0.0);
        assert_eq!(result.rmse, 0.0);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.average_growth_rate, 10.0);
    }

    #[test]
    fn flat_scenario_is_stable() {
        let result = ForecastEngine::new()
            .generate(&config(ForecastMethodKind::Linear, 1), &monthly(&[100.0; 3]))
            .unwrap();

        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.trend_slope, 0.0);
        assert_eq!(projected(&result), vec![100.0]);
        assert_eq!(result.mape, 0.0);
        assert_eq!(result.seasonality, Seasonality::NotDetected);
    }

    #[test]
    fn three_points_succeed_and_two_fail() {
        let engine = ForecastEngine::new();
        let cfg = config(ForecastMethodKind::Linear, 1);

        assert!(engine.generate(&cfg, &monthly(&[1.0, 2.0, 3.0])).is_ok());

        let err = engine.generate(&cfg, &monthly(&[1.0, 2.0])).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientHistory {
                required: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn all_zero_history_gives_flat_zero_forecast() {
        let result = ForecastEngine::new()
            .generate(&config(ForecastMethodKind::Linear, 4), &monthly(&[0.0; 6]))
            .unwrap();

        assert_eq!(result.mape, 0.0);
        assert_eq!(result.trend_slope, 0.0);
        assert!(projected(&result).iter().all(|p| *p == 0.0));
        assert_eq!(result.average_growth_rate, 0.0);
    }

    #[test]
    fn data_points_are_history_then_projection() {
        let series = monthly(&[10.0, 20.0, 30.0, 40.0]);
        let result = ForecastEngine::new()
            .generate(&config(ForecastMethodKind::WeightedAverage, 3), &series)
            .unwrap();

        assert_eq!(result.data_points.len(), 7);
        for (p, src) in result.data_points.iter().zip(&series) {
            assert_eq!(p.actual, Some(src.value));
            assert_eq!(p.predicted, src.value);
            assert_eq!(p.lower_bound, src.value);
            assert_eq!(p.upper_bound, src.value);
            assert_eq!(p.confidence, Confidence::High);
        }

        let periods: Vec<_> = result.projected().map(|p| p.period).collect();
        assert_eq!(
            periods,
            vec![
                Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn only_trailing_history_window_is_used() {
        let cfg = config(ForecastMethodKind::Linear, 1).with_historical_months(3);
        let result = ForecastEngine::new()
            .generate(&cfg, &monthly(&[500.0, 1.0, 10.0, 20.0, 30.0]))
            .unwrap();

        assert_eq!(result.historical().count(), 3);
        assert_eq!(result.total_historical, 60.0);
        assert_eq!(projected(&result), vec![40.0]);
    }

    #[test]
    fn a_year_of_history_detects_seasonality() {
        let values: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let result = ForecastEngine::new()
            .generate(&config(ForecastMethodKind::Seasonal, 2), &monthly(&values))
            .unwrap();
        assert_eq!(result.seasonality, Seasonality::Detected);
    }

    #[test]
    fn manual_method_compounds_growth_assumption() {
        let cfg = config(ForecastMethodKind::Manual, 2).with_assumption(GROWTH_RATE_ASSUMPTION, 10.0);
        let result = ForecastEngine::new()
            .generate(&cfg, &monthly(&[80.0, 90.0, 100.0]))
            .unwrap();
        assert_eq!(projected(&result), vec![110.0, 121.0]);
    }

    #[test]
    fn unordered_or_non_finite_series_is_rejected() {
        let engine = ForecastEngine::new();
        let cfg = config(ForecastMethodKind::Linear, 1);

        let mut shuffled = monthly(&[1.0, 2.0, 3.0]);
        shuffled.swap(0, 2);
        assert!(matches!(
            engine.generate(&cfg, &shuffled),
            Err(ForecastError::InvalidInput(_))
        ));

        assert!(matches!(
            engine.generate(&cfg, &monthly(&[1.0, f64::INFINITY, 3.0])),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_history_is_rejected() {
        // a month where refunds outweigh sales nets out below zero
        let err = ForecastEngine::new()
            .generate(
                &config(ForecastMethodKind::Linear, 1),
                &monthly(&[100.0, -40.0, 120.0]),
            )
            .unwrap_err();

        match err {
            ForecastError::InvalidInput(msg) => assert!(msg.contains("2024-02"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn slope_is_reported_as_classified() {
        let result = ForecastEngine::new()
            .generate(
                &config(ForecastMethodKind::Linear, 1),
                &monthly(&[100.0, 100.054, 100.108]),
            )
            .unwrap();

        assert_eq!(result.trend, Trend::Increasing);
        assert!((result.trend_slope - 0.054).abs() < 1e-9);
        assert!(result.trend_slope > crate::trend::TREND_THRESHOLD);
    }

    #[test]
    fn invalid_config_is_rejected_before_computing() {
        let cfg = config(ForecastMethodKind::Linear, 0);
        assert!(matches!(
            ForecastEngine::new().generate(&cfg, &monthly(&[1.0, 2.0, 3.0])),
            Err(ForecastError::InvalidConfig(_))
        ));
    }

    #[test]
    fn retrain_keeps_identity_and_replaces_results() {
        let engine = ForecastEngine::new();
        let tenant_id = TenantId::new();
        let id = ForecastId::new();
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

        let original = engine
            .create(
                tenant_id,
                id,
                config(ForecastMethodKind::Linear, 2),
                &monthly(&[100.0, 110.0, 120.0, 130.0]),
                t0,
            )
            .unwrap();
        assert_eq!(original.version, 1);

        let params = RetrainParams {
            forecast_months: Some(3),
            method: Some(ForecastMethodKind::WeightedAverage),
            ..RetrainParams::default()
        };
        let retrained = engine
            .retrain(&original, &params, &monthly(&[100.0, 110.0, 120.0, 130.0, 140.0]), t1)
            .unwrap();

        assert_eq!(retrained.id(), original.id());
        assert_eq!(retrained.tenant_id, tenant_id);
        assert_eq!(retrained.version(), 2);
        assert_eq!(retrained.last_trained_at, t1);
        assert_eq!(retrained.config.method, ForecastMethodKind::WeightedAverage);
        assert_eq!(retrained.result.projected().count(), 3);
        assert_eq!(retrained.result.total_historical, 600.0);
    }

    #[test]
    fn failed_retrain_reports_insufficient_history() {
        let engine = ForecastEngine::new();
        let original = engine
            .create(
                TenantId::new(),
                ForecastId::new(),
                config(ForecastMethodKind::Linear, 1),
                &monthly(&[1.0, 2.0, 3.0]),
                Utc::now(),
            )
            .unwrap();

        let err = engine
            .retrain(&original, &RetrainParams::default(), &monthly(&[1.0]), Utc::now())
            .unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientHistory { actual: 1, .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: a perfectly linear history is extrapolated exactly.
        #[test]
        fn linear_series_is_reproduced(
            a in 1.0f64..10_000.0,
            b in 0.0f64..500.0,
            n in 3usize..36,
            horizon in 1u32..12,
        ) {
            let values: Vec<f64> = (0..n).map(|i| a + b * i as f64).collect();
            let cfg = config(ForecastMethodKind::Linear, horizon)
                .with_historical_months(n as u32);
            let result = ForecastEngine::new().generate(&cfg, &monthly(&values)).unwrap();

            for (step, p) in result.projected().enumerate() {
                let expected = a + b * (n + step) as f64;
                prop_assert!((p.predicted - expected).abs() <= 0.01);
            }
            prop_assert!(result.mape <= 0.01);
            prop_assert!(result.rmse <= 0.01);
            prop_assert!(result.accuracy >= 99.99);
        }

        /// Property: every data point's band brackets its prediction.
        #[test]
        fn bands_bracket_predictions_for_every_method(
            values in prop::collection::vec(0.0f64..1_000_000.0, 3..30),
            method_idx in 0usize..5,
            horizon in 1u32..24,
            growth in -50.0f64..50.0,
        ) {
            let cfg = config(ALL_METHODS[method_idx], horizon)
                .with_historical_months(values.len() as u32)
                .with_assumption(GROWTH_RATE_ASSUMPTION, growth);
            let result = ForecastEngine::new().generate(&cfg, &monthly(&values)).unwrap();

            for p in &result.data_points {
                prop_assert!(p.lower_bound <= p.predicted);
                prop_assert!(p.predicted <= p.upper_bound);
                prop_assert!(p.lower_bound >= 0.0);
            }
        }

        /// Property: generation is deterministic.
        #[test]
        fn generate_is_idempotent(
            values in prop::collection::vec(0.0f64..1_000_000.0, 3..30),
            method_idx in 0usize..5,
            horizon in 1u32..24,
        ) {
            let cfg = config(ALL_METHODS[method_idx], horizon)
                .with_historical_months(values.len() as u32);
            let series = monthly(&values);
            let engine = ForecastEngine::new();

            let first = engine.generate(&cfg, &series).unwrap();
            let second = engine.generate(&cfg, &series).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: confidence labels never improve further into the future.
        #[test]
        fn confidence_degrades_with_horizon(
            values in prop::collection::vec(0.0f64..10_000.0, 3..12),
            horizon in 1u32..40,
        ) {
            let cfg = config(ForecastMethodKind::Linear, horizon)
                .with_historical_months(values.len() as u32);
            let result = ForecastEngine::new().generate(&cfg, &monthly(&values)).unwrap();

            let rank = |c: Confidence| match c {
                Confidence::High => 2,
                Confidence::Medium => 1,
                Confidence::Low => 0,
            };
            let labels: Vec<_> = result.projected().map(|p| rank(p.confidence)).collect();
            prop_assert!(labels.windows(2).all(|w| w[1] <= w[0]));
        }
    }
}
