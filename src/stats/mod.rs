//! Statistics over observation windows
//!
//! Three independent, stateless components share the same input shape:
//!
//! - descriptive statistics per variable ([`basic_stats`], [`advanced_stats`],
//!   [`weather_statistics`])
//! - ordinary-least-squares forecasting against the observation index
//!   ([`predict_future`], [`predict_multiple`])
//! - a Pearson correlation matrix across the core weather variables
//!   ([`correlation_matrix`])
//!
//! None of these hold state between calls. Conditions such as too few
//! samples are reported through the returned `Result` (or by omitting a key
//! in the batch operations), never by panicking.

pub mod correlation;
pub mod descriptive;
pub mod regression;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::observation::Variable;
use crate::window::ObservationWindow;

/// Nominal confidence reported on every forecast point
pub const FORECAST_CONFIDENCE: u8 = 95;

/// z-value used for the fixed-width forecast band
pub const FORECAST_Z: f64 = 1.96;

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Central tendency, dispersion and quantiles of one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    /// Number of values
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent exact value; lowest value on ties
    pub mode: f64,
    /// Sample standard deviation (n-1 divisor, 0 when n = 1)
    pub std_dev: f64,
    /// Sample variance (n-1 divisor, 0 when n = 1)
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
    pub p10: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    /// std_dev / mean * 100, 0 when the mean is 0
    pub coefficient_of_variation: f64,
}

impl BasicStats {
    /// Values rounded to two decimals
    pub fn rounded(&self) -> Self {
        let r = |v: f64| round_to(v, 2);
        BasicStats {
            count: self.count,
            mean: r(self.mean),
            median: r(self.median),
            mode: r(self.mode),
            std_dev: r(self.std_dev),
            variance: r(self.variance),
            min: r(self.min),
            max: r(self.max),
            range: r(self.range),
            q1: r(self.q1),
            q2: r(self.q2),
            q3: r(self.q3),
            iqr: r(self.iqr),
            p10: r(self.p10),
            p90: r(self.p90),
            p95: r(self.p95),
            p99: r(self.p99),
            coefficient_of_variation: r(self.coefficient_of_variation),
        }
    }
}

/// Two-sided confidence interval for the mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub margin: f64,
}

/// Shape statistics and mean inference, available from three samples up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedStats {
    /// Adjusted Fisher-Pearson skewness
    pub skewness: f64,
    /// Bias-corrected excess kurtosis. `None` for three values that are not
    /// all equal, where the estimator divides by zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kurtosis: Option<f64>,
    /// Standard error of the mean
    pub standard_error: f64,
    pub confidence_interval_95: ConfidenceInterval,
}

impl AdvancedStats {
    pub fn rounded(&self) -> Self {
        AdvancedStats {
            skewness: round_to(self.skewness, 3),
            kurtosis: self.kurtosis.map(|k| round_to(k, 3)),
            standard_error: round_to(self.standard_error, 3),
            confidence_interval_95: ConfidenceInterval {
                lower: round_to(self.confidence_interval_95.lower, 2),
                upper: round_to(self.confidence_interval_95.upper, 2),
                margin: round_to(self.confidence_interval_95.margin, 2),
            },
        }
    }
}

/// Full per-variable summary. `advanced` is `None` below three samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    #[serde(flatten)]
    pub basic: BasicStats,
    #[serde(flatten)]
    pub advanced: Option<AdvancedStats>,
}

impl StatisticsSummary {
    pub fn rounded(&self) -> Self {
        StatisticsSummary {
            basic: self.basic.rounded(),
            advanced: self.advanced.as_ref().map(AdvancedStats::rounded),
        }
    }
}

/// Fitted model kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LinearRegression,
}

/// Ordinary least squares fit of a variable against its window index.
/// All metrics are in-sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FittedRegression {
    #[serde(rename = "type")]
    pub kind: ModelKind,
    /// Slope per observation step
    pub coefficient: f64,
    pub intercept: f64,
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
    pub mse: f64,
    /// Population standard deviation of the residuals
    pub residual_std_dev: f64,
}

impl FittedRegression {
    /// Fitted value at an index
    pub fn predict(&self, index: f64) -> f64 {
        self.coefficient * index + self.intercept
    }

    pub fn rounded(&self) -> Self {
        FittedRegression {
            kind: self.kind,
            coefficient: round_to(self.coefficient, 4),
            intercept: round_to(self.intercept, 2),
            r2: round_to(self.r2, 4),
            rmse: round_to(self.rmse, 2),
            mae: round_to(self.mae, 2),
            mse: round_to(self.mse, 2),
            residual_std_dev: round_to(self.residual_std_dev, 2),
        }
    }
}

/// One extrapolated step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Offset from the last training index (1-based)
    pub step: usize,
    /// Window index the prediction was evaluated at
    pub index: usize,
    /// Issue time plus `step` hours
    pub timestamp: DateTime<Utc>,
    /// `%H:%M` rendering of `timestamp`
    pub time: String,
    /// `%Y-%m-%d %H:%M:%S` rendering of `timestamp`
    pub datetime: String,
    pub predicted: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Nominal confidence of the band, always [`FORECAST_CONFIDENCE`]
    pub confidence: u8,
}

impl ForecastPoint {
    pub fn rounded(&self) -> Self {
        ForecastPoint {
            predicted: round_to(self.predicted, 2),
            lower_bound: round_to(self.lower_bound, 2),
            upper_bound: round_to(self.upper_bound, 2),
            ..self.clone()
        }
    }
}

/// Successful forecast for one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionForecast {
    pub variable: Variable,
    pub model: FittedRegression,
    pub predictions: Vec<ForecastPoint>,
    /// Training points used for the fit
    pub data_points: usize,
    pub hours_ahead: usize,
}

impl RegressionForecast {
    pub fn rounded(&self) -> Self {
        RegressionForecast {
            variable: self.variable,
            model: self.model.rounded(),
            predictions: self.predictions.iter().map(ForecastPoint::rounded).collect(),
            data_points: self.data_points,
            hours_ahead: self.hours_ahead,
        }
    }
}

/// Serializable per-variable forecast entry: either a fitted model with its
/// predictions, or an error reason with `dataPoints = 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionReport {
    pub variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<FittedRegression>,
    pub predictions: Vec<ForecastPoint>,
    pub data_points: usize,
    pub hours_ahead: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegressionReport {
    pub fn from_result(
        variable: &str,
        hours_ahead: usize,
        result: &Result<RegressionForecast>,
    ) -> Self {
        match result {
            Ok(forecast) => RegressionReport {
                variable: forecast.variable.to_string(),
                model: Some(forecast.model.clone()),
                predictions: forecast.predictions.clone(),
                data_points: forecast.data_points,
                hours_ahead: forecast.hours_ahead,
                error: None,
            },
            Err(e) => RegressionReport {
                variable: variable.to_string(),
                model: None,
                predictions: Vec::new(),
                data_points: 0,
                hours_ahead,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn rounded(&self) -> Self {
        RegressionReport {
            model: self.model.as_ref().map(FittedRegression::rounded),
            predictions: self.predictions.iter().map(ForecastPoint::rounded).collect(),
            ..self.clone()
        }
    }
}

/// Symmetric Pearson correlation matrix with a unit diagonal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub matrix: BTreeMap<Variable, BTreeMap<Variable, f64>>,
    /// Variables included, in canonical order
    pub variables: Vec<Variable>,
    /// Records in the window
    pub data_points: usize,
}

impl CorrelationMatrix {
    /// Coefficient between two included variables
    pub fn get(&self, a: Variable, b: Variable) -> Option<f64> {
        self.matrix.get(&a).and_then(|row| row.get(&b)).copied()
    }

    /// Coefficients rounded to three decimals
    pub fn rounded(&self) -> Self {
        let matrix = self
            .matrix
            .iter()
            .map(|(a, row)| {
                let row = row.iter().map(|(b, r)| (*b, round_to(*r, 3))).collect();
                (*a, row)
            })
            .collect();
        CorrelationMatrix {
            matrix,
            variables: self.variables.clone(),
            data_points: self.data_points,
        }
    }
}

/// Descriptive statistics for one sample (count through coefficient of
/// variation)
///
/// # Errors
/// `EmptyData` when the sample is empty.
///
/// # Example
/// ```rust
/// use meteo_stats::stats;
///
/// let stats = stats::basic_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(stats.median, 3.0);
/// assert_eq!(stats.range, 4.0);
/// ```
pub fn basic_stats<T: AsRef<[f64]>>(data: T) -> Result<BasicStats> {
    descriptive::basic_stats_impl(data.as_ref())
}

/// Skewness, kurtosis, standard error and a 95% confidence interval for the
/// mean
///
/// # Errors
/// `InsufficientData` for fewer than three samples.
pub fn advanced_stats<T: AsRef<[f64]>>(data: T) -> Result<AdvancedStats> {
    descriptive::advanced_stats_impl(data.as_ref())
}

/// [`basic_stats`] plus [`advanced_stats`] when there are enough samples
pub fn summarize<T: AsRef<[f64]>>(data: T) -> Result<StatisticsSummary> {
    descriptive::summarize_impl(data.as_ref())
}

/// Summaries for every variable in [`Variable::STATISTICS`]. Variables with
/// no present value are omitted.
pub fn weather_statistics(window: &ObservationWindow) -> BTreeMap<Variable, StatisticsSummary> {
    descriptive::weather_statistics_impl(window)
}

/// Pearson correlation between two equally long sequences
///
/// # Errors
/// `DimensionMismatch`, `InsufficientData` below two pairs, and
/// `DegenerateInput` when either side has zero variance.
pub fn correlation<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U) -> Result<f64> {
    correlation::pearson_impl(x.as_ref(), y.as_ref())
}

/// Correlation matrix across [`Variable::CORRELATION`]
///
/// # Errors
/// `InsufficientData` when the window has fewer than two records or fewer
/// than two variables have any present value.
pub fn correlation_matrix(window: &ObservationWindow) -> Result<CorrelationMatrix> {
    correlation::correlation_matrix_impl(window)
}

/// Regression inputs for a variable: window positions and values where the
/// variable is present. Both vectors are empty for an unknown variable name
/// or when nothing is present.
pub fn prepare_series(window: &ObservationWindow, variable: &str) -> (Vec<f64>, Vec<f64>) {
    match variable.parse::<Variable>() {
        Ok(v) => regression::prepare_series_impl(window, v),
        Err(_) => (Vec::new(), Vec::new()),
    }
}

/// Fit a line against the window index and extrapolate `horizon_steps`
/// hourly steps from now
///
/// # Errors
/// `UnknownVariable` for an unrecognised name, `InsufficientData` for fewer
/// than two usable points.
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use meteo_stats::{stats, Observation, ObservationWindow, Variable};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let window: ObservationWindow = (0..10)
///     .map(|i| {
///         Observation::new(start + Duration::hours(i))
///             .with(Variable::Temperature, 20.0 + i as f64)
///     })
///     .collect();
///
/// let forecast = stats::predict_future(&window, "temperature", 3).unwrap();
/// assert!((forecast.model.coefficient - 1.0).abs() < 1e-9);
/// assert_eq!(forecast.predictions.len(), 3);
/// ```
pub fn predict_future(
    window: &ObservationWindow,
    variable: &str,
    horizon_steps: usize,
) -> Result<RegressionForecast> {
    predict_future_at(window, variable, horizon_steps, Utc::now())
}

/// [`predict_future`] with an explicit issue time
pub fn predict_future_at(
    window: &ObservationWindow,
    variable: &str,
    horizon_steps: usize,
    issued_at: DateTime<Utc>,
) -> Result<RegressionForecast> {
    let variable = variable.parse::<Variable>()?;
    regression::predict_future_impl(window, variable, horizon_steps, issued_at)
}

/// [`predict_future`] for several variables. Each entry carries its own
/// result; one failing variable does not affect the others.
pub fn predict_multiple(
    window: &ObservationWindow,
    variables: &[&str],
    horizon_steps: usize,
) -> BTreeMap<String, Result<RegressionForecast>> {
    predict_multiple_at(window, variables, horizon_steps, Utc::now())
}

/// [`predict_multiple`] with an explicit issue time
pub fn predict_multiple_at(
    window: &ObservationWindow,
    variables: &[&str],
    horizon_steps: usize,
    issued_at: DateTime<Utc>,
) -> BTreeMap<String, Result<RegressionForecast>> {
    regression::predict_multiple_impl(window, variables, horizon_steps, issued_at)
}
