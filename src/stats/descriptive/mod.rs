// Descriptive statistics module

use std::collections::BTreeMap;

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{Error, Result};
use crate::observation::Variable;
use crate::stats::{AdvancedStats, BasicStats, ConfidenceInterval, StatisticsSummary};
use crate::window::ObservationWindow;

/// Normal critical value used when the t distribution has no degrees of
/// freedom
const Z_CRITICAL_95: f64 = 1.96;

/// Internal implementation of the basic statistics
pub(crate) fn basic_stats_impl(data: &[f64]) -> Result<BasicStats> {
    if data.is_empty() {
        return Err(Error::EmptyData(
            "descriptive statistics need at least one value".into(),
        ));
    }
    check_finite(data)?;

    let count = data.len();
    let mean = mean(data);

    // Sample variance; a single value has no spread
    let variance = sample_variance(data, mean);
    let std_dev = variance.sqrt();

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let min = sorted[0];
    let max = sorted[count - 1];

    let q1 = percentile(&sorted, 0.25);
    let q2 = percentile(&sorted, 0.50);
    let q3 = percentile(&sorted, 0.75);

    // A near-zero mean can overflow the ratio
    let coefficient_of_variation = match std_dev / mean * 100.0 {
        cv if mean != 0.0 && cv.is_finite() => cv,
        _ => 0.0,
    };

    Ok(BasicStats {
        count,
        mean,
        median: q2,
        mode: mode(&sorted),
        std_dev,
        variance,
        min,
        max,
        range: max - min,
        q1,
        q2,
        q3,
        iqr: q3 - q1,
        p10: percentile(&sorted, 0.10),
        p90: percentile(&sorted, 0.90),
        p95: percentile(&sorted, 0.95),
        p99: percentile(&sorted, 0.99),
        coefficient_of_variation,
    })
}

/// Internal implementation of the shape and inference statistics
pub(crate) fn advanced_stats_impl(data: &[f64]) -> Result<AdvancedStats> {
    let n = data.len();
    if n < 3 {
        return Err(Error::InsufficientData(format!(
            "skewness and kurtosis need at least 3 values, got {}",
            n
        )));
    }
    check_finite(data)?;

    let mean = mean(data);
    let std_dev = sample_variance(data, mean).sqrt();
    let nf = n as f64;

    let (skewness, kurtosis) = if is_negligible(std_dev, mean) {
        (0.0, Some(0.0))
    } else {
        let standardized = |power: i32| {
            data.iter()
                .map(|&x| ((x - mean) / std_dev).powi(power))
                .sum::<f64>()
        };

        let skewness = nf / ((nf - 1.0) * (nf - 2.0)) * standardized(3);

        // The n-3 divisor leaves kurtosis undefined for three values
        let kurtosis = if n > 3 {
            let lead = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0));
            let correction = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
            Some(lead * standardized(4) - correction)
        } else {
            None
        };

        (skewness, kurtosis)
    };

    let standard_error = std_dev / nf.sqrt();
    let margin = t_critical_95(n)? * standard_error;

    Ok(AdvancedStats {
        skewness,
        kurtosis,
        standard_error,
        confidence_interval_95: ConfidenceInterval {
            lower: mean - margin,
            upper: mean + margin,
            margin,
        },
    })
}

/// Basic statistics plus the advanced ones when there are enough values
pub(crate) fn summarize_impl(data: &[f64]) -> Result<StatisticsSummary> {
    let basic = basic_stats_impl(data)?;
    let advanced = match advanced_stats_impl(data) {
        Ok(advanced) => Some(advanced),
        Err(e) if e.is_insufficient() => None,
        Err(e) => return Err(e),
    };
    Ok(StatisticsSummary { basic, advanced })
}

/// Summaries for the fixed statistics vocabulary
pub(crate) fn weather_statistics_impl(
    window: &ObservationWindow,
) -> BTreeMap<Variable, StatisticsSummary> {
    let mut result = BTreeMap::new();

    for variable in Variable::STATISTICS {
        let sample = window.sample(variable);
        if sample.is_empty() {
            log::debug!("no values for {}, omitted from statistics", variable);
            continue;
        }

        match summarize_impl(&sample) {
            Ok(summary) => {
                result.insert(variable, summary);
            }
            Err(e) => log::warn!("statistics for {} not computable: {}", variable, e),
        }
    }

    result
}

/// Two-tailed 95% Student's t critical value for a sample of `n` values
pub(crate) fn t_critical_95(n: usize) -> Result<f64> {
    if n <= 1 {
        return Ok(Z_CRITICAL_95);
    }
    let dist = StudentsT::new(0.0, 1.0, (n - 1) as f64).map_err(|e| {
        Error::ComputationError(format!("failed to create t-distribution: {}", e))
    })?;
    Ok(dist.inverse_cdf(0.975))
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn sample_variance(data: &[f64], mean: f64) -> f64 {
    if data.len() > 1 {
        let sum_squared_diff = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
        sum_squared_diff / (data.len() - 1) as f64
    } else {
        0.0
    }
}

/// A spread is treated as zero when it is below machine precision at the
/// scale of the mean
fn is_negligible(spread: f64, mean: f64) -> bool {
    spread <= std::f64::EPSILON * mean.abs().max(1.0)
}

fn check_finite(data: &[f64]) -> Result<()> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(Error::InvalidInput(format!(
            "non-finite value at position {}",
            i
        ))),
        None => Ok(()),
    }
}

/// Percentile by linear interpolation between order statistics
pub(crate) fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let n = sorted_data.len();
    let idx = p * (n - 1) as f64;
    let idx_floor = idx.floor() as usize;
    let idx_ceil = (idx.ceil() as usize).min(n - 1);

    if idx_floor == idx_ceil {
        return sorted_data[idx_floor];
    }

    let weight_ceil = idx - idx_floor as f64;
    let weight_floor = 1.0 - weight_ceil;

    sorted_data[idx_floor] * weight_floor + sorted_data[idx_ceil] * weight_ceil
}

/// Most frequent exact value of sorted data; the lowest wins a tie
fn mode(sorted_data: &[f64]) -> f64 {
    let mut best_value = sorted_data[0];
    let mut best_count = 0;

    let mut i = 0;
    while i < sorted_data.len() {
        let value = sorted_data[i];
        let run = sorted_data[i..].iter().take_while(|&&v| v == value).count();
        if run > best_count {
            best_value = value;
            best_count = run;
        }
        i += run;
    }

    best_value
}
