// Regression and forecasting module
//
// The independent variable is the position in the window, not elapsed time.
// This keeps the fit well defined for irregular or gapped windows; the slope
// is therefore "per observation", not "per hour".

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::observation::Variable;
use crate::stats::{
    FittedRegression, ForecastPoint, ModelKind, RegressionForecast, FORECAST_CONFIDENCE,
    FORECAST_Z,
};
use crate::window::ObservationWindow;

/// Window positions and values where the variable is present
pub(crate) fn prepare_series_impl(
    window: &ObservationWindow,
    variable: Variable,
) -> (Vec<f64>, Vec<f64>) {
    window
        .indexed_sample(variable)
        .into_iter()
        .map(|(i, v)| (i as f64, v))
        .unzip()
}

/// Closed-form simple linear regression `y = coefficient * x + intercept`
pub(crate) fn fit_ols(x: &[f64], y: &[f64]) -> Result<FittedRegression> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }

    let n = x.len();
    if n < 2 {
        return Err(Error::InsufficientData(format!(
            "linear regression needs at least 2 points, got {}",
            n
        )));
    }

    let nf = n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    // Σ(x - x̄)(y - ȳ) and Σ(x - x̄)²
    let sxy = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - x_mean) * (yi - y_mean))
        .sum::<f64>();
    let sxx = x.iter().map(|&xi| (xi - x_mean).powi(2)).sum::<f64>();

    if sxx.abs() < std::f64::EPSILON {
        return Err(Error::DegenerateInput(
            "independent variable has zero variance".into(),
        ));
    }

    let coefficient = sxy / sxx;
    let intercept = y_mean - coefficient * x_mean;

    let residuals: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| yi - (coefficient * xi + intercept))
        .collect();

    let ss_residual = residuals.iter().map(|r| r.powi(2)).sum::<f64>();
    let ss_total = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum::<f64>();

    let mse = ss_residual / nf;
    let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / nf;
    let r2 = r_squared(ss_residual, ss_total, nf * y_mean * y_mean);

    // Population standard deviation of the residuals
    let residual_mean = residuals.iter().sum::<f64>() / nf;
    let residual_std_dev = (residuals
        .iter()
        .map(|r| (r - residual_mean).powi(2))
        .sum::<f64>()
        / nf)
        .sqrt();

    Ok(FittedRegression {
        kind: ModelKind::LinearRegression,
        coefficient,
        intercept,
        r2,
        rmse: mse.sqrt(),
        mae,
        mse,
        residual_std_dev,
    })
}

/// Coefficient of determination. A constant target has no variance to
/// explain: a perfect fit scores 1, anything else 0.
///
/// `ss_mean` is `n * ȳ²`, so "constant" is judged relative to the data's
/// own magnitude.
fn r_squared(ss_residual: f64, ss_total: f64, ss_mean: f64) -> f64 {
    let tolerance = std::f64::EPSILON * ss_mean;
    if ss_total <= tolerance {
        if ss_residual <= tolerance {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_residual / ss_total
    }
}

/// Internal implementation of the single-variable forecast
pub(crate) fn predict_future_impl(
    window: &ObservationWindow,
    variable: Variable,
    horizon_steps: usize,
    issued_at: DateTime<Utc>,
) -> Result<RegressionForecast> {
    let (x, y) = prepare_series_impl(window, variable);
    if x.len() < 2 {
        log::warn!(
            "{}: {} usable points in a window of {}, cannot fit",
            variable,
            x.len(),
            window.len()
        );
        return Err(Error::InsufficientData(format!(
            "{} has {} usable points, at least 2 are needed for a prediction",
            variable,
            x.len()
        )));
    }

    let model = fit_ols(&x, &y)?;
    log::debug!(
        "{}: fitted slope={:.4} intercept={:.4} r2={:.4} on {} points",
        variable,
        model.coefficient,
        model.intercept,
        model.r2,
        x.len()
    );

    // Fixed-width band: the same half-width applies at every step
    let half_width = FORECAST_Z * model.residual_std_dev;
    let last_index = *x.last().unwrap_or(&0.0) as usize;

    let predictions = (1..=horizon_steps)
        .map(|step| {
            let index = last_index + step;
            let predicted = model.predict(index as f64);
            let timestamp = issued_at + Duration::hours(step as i64);
            ForecastPoint {
                step,
                index,
                timestamp,
                time: timestamp.format("%H:%M").to_string(),
                datetime: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                predicted,
                lower_bound: predicted - half_width,
                upper_bound: predicted + half_width,
                confidence: FORECAST_CONFIDENCE,
            }
        })
        .collect();

    Ok(RegressionForecast {
        variable,
        model,
        predictions,
        data_points: x.len(),
        hours_ahead: horizon_steps,
    })
}

/// Independent forecasts for several variables, sharing one issue time
pub(crate) fn predict_multiple_impl(
    window: &ObservationWindow,
    variables: &[&str],
    horizon_steps: usize,
    issued_at: DateTime<Utc>,
) -> BTreeMap<String, Result<RegressionForecast>> {
    variables
        .par_iter()
        .map(|&name| {
            let result = name.parse::<Variable>().and_then(|variable| {
                predict_future_impl(window, variable, horizon_steps, issued_at)
            });
            (name.to_string(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Observation;
    use chrono::TimeZone;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()
    }

    fn window_from(values: &[Option<f64>]) -> ObservationWindow {
        let start = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Observation::new(start + Duration::hours(i as i64))
                    .with(Variable::Pressure, *v)
            })
            .collect()
    }

    #[test]
    fn test_fit_perfect_line() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&i| 2.0 * i + 5.0).collect();
        let model = fit_ols(&x, &y).unwrap();

        assert!((model.coefficient - 2.0).abs() < 1e-10);
        assert!((model.intercept - 5.0).abs() < 1e-10);
        assert!((model.r2 - 1.0).abs() < 1e-10);
        assert!(model.rmse < 1e-9);
        assert!(model.residual_std_dev < 1e-9);
    }

    #[test]
    fn test_fit_metrics() {
        // y = [1, 3, 2, 4]: slope 0.8, intercept 1.3
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![1.0, 3.0, 2.0, 4.0];
        let model = fit_ols(&x, &y).unwrap();

        assert!((model.coefficient - 0.8).abs() < 1e-10);
        assert!((model.intercept - 1.3).abs() < 1e-10);
        // residuals: -0.3, 0.9, -0.9, 0.3
        assert!((model.mse - 0.45).abs() < 1e-10);
        assert!((model.mae - 0.6).abs() < 1e-10);
        assert!((model.r2 - 0.64).abs() < 1e-10);
        assert!((model.residual_std_dev - 0.45f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_fit_metrics_independent_of_units() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = [1.0, 3.0, 2.0, 4.0].iter().map(|v| v * 1e-9).collect();
        let model = fit_ols(&x, &y).unwrap();

        assert!((model.coefficient - 0.8e-9).abs() < 1e-20);
        assert!((model.r2 - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_fit_constant_target() {
        let model = fit_ols(&[0.0, 1.0, 2.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(model.coefficient, 0.0);
        assert_eq!(model.r2, 1.0);
    }

    #[test]
    fn test_fit_rejects_short_input() {
        assert!(matches!(
            fit_ols(&[1.0], &[1.0]),
            Err(Error::InsufficientData(_))
        ));
        assert!(matches!(
            fit_ols(&[1.0, 2.0], &[1.0]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_prepare_series_skips_gaps() {
        let window = window_from(&[Some(1010.0), None, Some(1012.0), Some(1013.0)]);
        let (x, y) = prepare_series_impl(&window, Variable::Pressure);
        assert_eq!(x, vec![0.0, 2.0, 3.0]);
        assert_eq!(y, vec![1010.0, 1012.0, 1013.0]);
    }

    #[test]
    fn test_forecast_band_is_fixed_width() {
        let window = window_from(&[Some(1.0), Some(3.0), Some(2.0), Some(4.0)]);
        let forecast =
            predict_future_impl(&window, Variable::Pressure, 5, issued()).unwrap();

        assert_eq!(forecast.predictions.len(), 5);
        let widths: Vec<f64> = forecast
            .predictions
            .iter()
            .map(|p| p.upper_bound - p.lower_bound)
            .collect();
        for w in &widths {
            assert!((w - widths[0]).abs() < 1e-12);
            assert!((w - 2.0 * 1.96 * 0.45f64.sqrt()).abs() < 1e-10);
        }
        assert!(forecast.predictions.iter().all(|p| p.confidence == 95));
    }

    #[test]
    fn test_forecast_anchored_to_issue_time() {
        let window = window_from(&[Some(1.0), Some(2.0), None]);
        let forecast =
            predict_future_impl(&window, Variable::Pressure, 2, issued()).unwrap();

        let first = &forecast.predictions[0];
        assert_eq!(first.step, 1);
        // Last present point sits at index 1
        assert_eq!(first.index, 2);
        assert_eq!(first.timestamp, issued() + Duration::hours(1));
        assert_eq!(first.time, "09:00");
        assert_eq!(first.datetime, "2024-03-10 09:00:00");
        assert!((first.predicted - 3.0).abs() < 1e-10);
        assert_eq!(forecast.data_points, 2);
    }

    #[test]
    fn test_forecast_insufficient() {
        let window = window_from(&[Some(1.0), None, None]);
        let result = predict_future_impl(&window, Variable::Pressure, 3, issued());
        assert!(matches!(result, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_predict_multiple_isolates_failures() {
        let window = window_from(&[Some(1.0), Some(2.0), Some(3.0)]);
        let results =
            predict_multiple_impl(&window, &["pressure", "humidity", "dewPoint"], 2, issued());

        assert_eq!(results.len(), 3);
        assert!(results["pressure"].is_ok());
        assert!(matches!(results["humidity"], Err(Error::InsufficientData(_))));
        assert!(matches!(results["dewPoint"], Err(Error::UnknownVariable(_))));
    }
}
