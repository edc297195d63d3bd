//! Common test utilities module
//!
//! Provides shared utilities for tests including:
//! - Hourly observation window builders
//! - Temporary file management with cleanup

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use meteo_stats::{Observation, ObservationWindow, Variable, NA};

static TEST_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fixed start time for generated windows
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()
}

/// An hourly window of `n` records with every field missing
pub fn empty_window(n: usize) -> ObservationWindow {
    (0..n)
        .map(|i| Observation::new(start_time() + Duration::hours(i as i64)))
        .collect()
}

/// An hourly window where each listed variable takes `f(i)` at record `i`
pub fn hourly_window<F>(n: usize, variables: &[Variable], f: F) -> ObservationWindow
where
    F: Fn(Variable, usize) -> Option<f64>,
{
    (0..n)
        .map(|i| {
            let mut obs = Observation::new(start_time() + Duration::hours(i as i64));
            for &v in variables {
                obs.set(v, NA::from(f(v, i)));
            }
            obs
        })
        .collect()
}

/// 24 hourly records with temperature rising from 20.0 to 31.5 in 0.5 steps
pub fn rising_temperature_window() -> ObservationWindow {
    hourly_window(24, &[Variable::Temperature], |_, i| Some(20.0 + 0.5 * i as f64))
}

/// RAII wrapper for temporary test files with automatic cleanup
pub struct TempTestFile {
    path: PathBuf,
}

impl TempTestFile {
    /// Create a new temporary file path unique to this test run
    pub fn new(test_name: &str, extension: &str) -> Self {
        let counter = TEST_FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let filename = format!(
            "meteo_stats_test_{}_{}_{}.{}",
            test_name,
            std::process::id(),
            counter,
            extension
        );
        TempTestFile {
            path: std::env::temp_dir().join(filename),
        }
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempTestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
