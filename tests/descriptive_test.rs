mod common;

use meteo_stats::error::Error;
use meteo_stats::stats;
use meteo_stats::Variable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{empty_window, hourly_window, rising_temperature_window};

fn random_sample(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.random_range(-40.0..60.0)).collect()
}

#[test]
fn test_quantiles_are_ordered() {
    let mut rng = StdRng::seed_from_u64(7);

    for len in 1..60 {
        let sample = random_sample(&mut rng, len);
        let s = stats::basic_stats(&sample).unwrap();

        assert!(s.min <= s.q1, "min > q1 for {:?}", sample);
        assert!(s.q1 <= s.q2);
        assert!(s.q2 <= s.q3);
        assert!(s.q3 <= s.max);
        assert_eq!(s.q2, s.median);
        assert!(s.iqr >= 0.0);
        assert!(s.range >= 0.0);
        assert!((s.range - (s.max - s.min)).abs() < 1e-12);
        assert!(s.p10 <= s.p90 && s.p90 <= s.p95 && s.p95 <= s.p99);
    }
}

#[test]
fn test_median_matches_standard_definition() {
    let odd = stats::basic_stats(&[9.0, 1.0, 5.0, 3.0, 7.0]).unwrap();
    assert_eq!(odd.median, 5.0);

    let even = stats::basic_stats(&[4.0, 1.0, 3.0, 2.0]).unwrap();
    assert!((even.median - 2.5).abs() < 1e-12);
}

#[test]
fn test_variance_is_std_squared() {
    let mut rng = StdRng::seed_from_u64(11);

    for len in 2..40 {
        let sample = random_sample(&mut rng, len);
        let s = stats::basic_stats(&sample).unwrap();
        assert!(s.std_dev >= 0.0);
        assert!((s.variance - s.std_dev.powi(2)).abs() < 1e-9 * s.variance.max(1.0));
    }
}

#[test]
fn test_empty_sample_is_no_data() {
    let empty: Vec<f64> = Vec::new();
    assert!(matches!(stats::basic_stats(&empty), Err(Error::EmptyData(_))));
    assert!(stats::summarize(&empty).is_err());
}

#[test]
fn test_short_sample_has_no_advanced_stats() {
    let summary = stats::summarize(&[3.0, 4.0]).unwrap();
    assert_eq!(summary.basic.count, 2);
    assert!(summary.advanced.is_none());

    let err = stats::advanced_stats(&[3.0, 4.0]).unwrap_err();
    assert!(err.is_insufficient());
}

#[test]
fn test_rising_temperature_example() {
    let window = rising_temperature_window();
    let sample = window.sample(Variable::Temperature);
    let s = stats::basic_stats(&sample).unwrap();

    assert_eq!(s.count, 24);
    assert!((s.mean - 25.75).abs() < 1e-12);
    assert_eq!(s.min, 20.0);
    assert_eq!(s.max, 31.5);
    assert!((s.range - 11.5).abs() < 1e-12);
    // Symmetric, evenly spaced values
    let advanced = stats::advanced_stats(&sample).unwrap();
    assert!(advanced.skewness.abs() < 1e-9);
    let ci = advanced.confidence_interval_95;
    assert!(ci.lower < s.mean && s.mean < ci.upper);
}

#[test]
fn test_weather_statistics_omits_absent_variables() {
    let window = hourly_window(
        12,
        &[Variable::Temperature, Variable::Humidity, Variable::Pm25],
        |v, i| match v {
            Variable::Temperature => Some(18.0 + i as f64),
            Variable::Humidity => Some(70.0 - i as f64),
            // Sensor only reports every third hour
            Variable::Pm25 if i % 3 == 0 => Some(10.0 + i as f64),
            _ => None,
        },
    );

    let result = stats::weather_statistics(&window);

    assert!(result.contains_key(&Variable::Temperature));
    assert!(result.contains_key(&Variable::Humidity));
    assert!(!result.contains_key(&Variable::Precipitation));
    assert!(!result.contains_key(&Variable::Pressure));

    // Missing readings are elided, not zero-filled
    let pm25 = &result[&Variable::Pm25];
    assert_eq!(pm25.basic.count, 4);
    assert_eq!(pm25.basic.min, 10.0);
    assert!((pm25.basic.mean - 14.5).abs() < 1e-12);
}

#[test]
fn test_weather_statistics_on_empty_window() {
    assert!(stats::weather_statistics(&empty_window(0)).is_empty());
    assert!(stats::weather_statistics(&empty_window(5)).is_empty());
}

#[test]
fn test_weather_statistics_single_record() {
    let window = hourly_window(1, &[Variable::Pressure], |_, _| Some(1013.2));
    let result = stats::weather_statistics(&window);

    let pressure = &result[&Variable::Pressure];
    assert_eq!(pressure.basic.std_dev, 0.0);
    assert_eq!(pressure.basic.coefficient_of_variation, 0.0);
    assert!(pressure.advanced.is_none());
}

#[test]
fn test_rounded_summary() {
    let summary = stats::summarize(&[1.0, 2.0, 3.0, 4.0, 10.0]).unwrap().rounded();
    assert_eq!(summary.basic.std_dev, 3.54);
    let advanced = summary.advanced.unwrap();
    assert_eq!(advanced.skewness, 1.697);
    assert_eq!(advanced.kurtosis, Some(3.152));
    assert_eq!(advanced.standard_error, 1.581);
}
