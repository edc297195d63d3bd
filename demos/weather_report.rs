//! Weather report example
//!
//! Builds a two-day synthetic window (or loads one from a JSON/CSV file given
//! as the first argument), applies the analytics configuration and prints
//! statistics, forecasts and correlations as JSON.
//!
//! ```text
//! cargo run --example weather_report -- observations.json analytics.toml
//! ```

use std::collections::BTreeMap;
use std::env;

use chrono::{Duration, TimeZone, Utc};
use meteo_stats::io::{read_window_csv, read_window_json};
use meteo_stats::stats;
use meteo_stats::{AnalyticsConfig, Observation, ObservationWindow, RegressionReport, Variable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let window = match args.get(1) {
        Some(path) if path.ends_with(".csv") => read_window_csv(path)?,
        Some(path) => read_window_json(path)?,
        None => synthetic_window(),
    };
    let config = match args.get(2) {
        Some(path) => AnalyticsConfig::from_file(path)?,
        None => AnalyticsConfig::default(),
    };

    let training = config.training_slice(&window);
    println!(
        "Analysing {} of {} records (horizon {} h)",
        training.len(),
        window.len(),
        config.horizon_steps
    );

    // Statistics
    let mut summaries = stats::weather_statistics(&training);
    if config.round_output {
        summaries = summaries
            .into_iter()
            .map(|(v, s)| (v, s.rounded()))
            .collect();
    }
    println!("\n=== Statistics ===");
    println!("{}", serde_json::to_string_pretty(&summaries)?);

    // Forecasts
    let horizon = config.check_horizon(config.horizon_steps)?;
    let forecasts = stats::predict_multiple(
        &training,
        &["temperature", "humidity", "pressure", "windSpeed"],
        horizon,
    );
    let reports: BTreeMap<String, RegressionReport> = forecasts
        .into_iter()
        .map(|(name, result)| {
            let report = RegressionReport::from_result(&name, horizon, &result);
            let report = if config.round_output {
                report.rounded()
            } else {
                report
            };
            (name, report)
        })
        .collect();
    println!("\n=== Forecasts ===");
    for (name, report) in &reports {
        match (&report.model, &report.error) {
            (Some(model), _) => println!(
                "{:<12} slope {:>8.4}/h  r2 {:.4}  next {:?}",
                name,
                model.coefficient,
                model.r2,
                report.predictions.first().map(|p| p.predicted)
            ),
            (None, Some(error)) => println!("{:<12} unavailable: {}", name, error),
            (None, None) => println!("{:<12} unavailable", name),
        }
    }

    // Correlations
    println!("\n=== Correlations ===");
    match stats::correlation_matrix(&training) {
        Ok(matrix) => {
            let matrix = if config.round_output {
                matrix.rounded()
            } else {
                matrix
            };
            println!("{}", serde_json::to_string_pretty(&matrix)?);
        }
        Err(e) => println!("not available: {}", e),
    }

    Ok(())
}

/// Two days of hourly records with a daily temperature cycle
fn synthetic_window() -> ObservationWindow {
    let start = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    (0..48)
        .map(|i| {
            let phase = (i % 24) as f64 / 24.0 * std::f64::consts::TAU;
            let mut obs = Observation::new(start + Duration::hours(i))
                .with(Variable::Temperature, 22.0 + 5.0 * phase.sin() + 0.05 * i as f64)
                .with(Variable::Humidity, 65.0 - 12.0 * phase.sin())
                .with(Variable::Pressure, 1012.0 + 0.1 * i as f64)
                .with(Variable::WindSpeed, 3.0 + (i % 5) as f64 * 0.4);
            if i % 7 == 0 {
                obs = obs.with(Variable::Precipitation, 0.2 * (i % 3) as f64);
            }
            obs
        })
        .collect()
}
