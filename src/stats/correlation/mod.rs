// Correlation analysis module

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::observation::Variable;
use crate::stats::CorrelationMatrix;
use crate::window::{extract_paired, ObservationWindow};

/// Pearson product-moment correlation of two aligned sequences
pub(crate) fn pearson_impl(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }

    let n = x.len();
    if n < 2 {
        return Err(Error::InsufficientData(format!(
            "correlation needs at least 2 paired values, got {}",
            n
        )));
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    // Numerator: Σ(xi - x̄)(yi - ȳ)
    let numerator = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
        .sum::<f64>();

    // Denominator: √[Σ(xi - x̄)² · Σ(yi - ȳ)²]
    let sum_squared_diff_x = x.iter().map(|&xi| (xi - mean_x).powi(2)).sum::<f64>();
    let sum_squared_diff_y = y.iter().map(|&yi| (yi - mean_y).powi(2)).sum::<f64>();

    let denominator = (sum_squared_diff_x * sum_squared_diff_y).sqrt();

    // Zero variance is judged against each sequence's own magnitude
    let flat = |ss: f64, mean: f64| ss <= std::f64::EPSILON * n as f64 * mean * mean;
    if flat(sum_squared_diff_x, mean_x)
        || flat(sum_squared_diff_y, mean_y)
        || denominator == 0.0
        || !denominator.is_finite()
    {
        return Err(Error::DegenerateInput(
            "correlation is undefined for a zero-variance sequence".into(),
        ));
    }

    // Rounding can push |r| a hair past 1
    Ok((numerator / denominator).clamp(-1.0, 1.0))
}

/// Internal implementation of the correlation matrix
pub(crate) fn correlation_matrix_impl(window: &ObservationWindow) -> Result<CorrelationMatrix> {
    if window.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "correlation matrix needs at least 2 records, got {}",
            window.len()
        )));
    }

    let variables: Vec<Variable> = Variable::CORRELATION
        .iter()
        .copied()
        .filter(|&v| window.iter().any(|obs| obs.get(v).finite().is_some()))
        .collect();

    if variables.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "correlation matrix needs at least 2 variables with data, got {}",
            variables.len()
        )));
    }

    let mut matrix: BTreeMap<Variable, BTreeMap<Variable, f64>> = variables
        .iter()
        .map(|&v| (v, BTreeMap::from([(v, 1.0)])))
        .collect();

    for (i, &a) in variables.iter().enumerate() {
        for &b in &variables[i + 1..] {
            let (xs, ys) = extract_paired(window, a, b);
            let r = match pearson_impl(&xs, &ys) {
                Ok(r) => r,
                Err(e) => {
                    log::trace!("{} vs {} undefined ({}), using 0", a, b, e);
                    0.0
                }
            };
            log::trace!("{} vs {}: r={:.4} over {} pairs", a, b, r, xs.len());

            if let Some(row) = matrix.get_mut(&a) {
                row.insert(b, r);
            }
            if let Some(row) = matrix.get_mut(&b) {
                row.insert(a, r);
            }
        }
    }

    Ok(CorrelationMatrix {
        matrix,
        variables,
        data_points: window.len(),
    })
}
