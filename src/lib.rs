#![allow(clippy::needless_return)]
#![allow(clippy::result_large_err)]

//! Statistical analytics over windows of weather observations.
//!
//! Given an ordered window of timestamped observations this crate computes
//! descriptive statistics per variable, linear-regression forecasts with a
//! confidence band, and a Pearson correlation matrix. Every computation is a
//! one-shot, stateless batch over the caller's window.
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use meteo_stats::{stats, Observation, ObservationWindow, Variable};
//!
//! let start = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
//! let window: ObservationWindow = (0..24)
//!     .map(|i| {
//!         Observation::new(start + Duration::hours(i))
//!             .with(Variable::Temperature, 20.0 + 0.5 * i as f64)
//!     })
//!     .collect();
//!
//! let summaries = stats::weather_statistics(&window);
//! assert_eq!(summaries[&Variable::Temperature].basic.mean, 25.75);
//! assert!(!summaries.contains_key(&Variable::Precipitation));
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod na;
pub mod observation;
pub mod stats;
pub mod window;

// Re-export commonly used types
pub use config::{AnalyticsConfig, AnalyticsConfigBuilder};
pub use error::{Error, Result};
pub use na::NA;
pub use observation::{Observation, Variable};
pub use stats::{
    BasicStats, AdvancedStats, ConfidenceInterval, CorrelationMatrix, FittedRegression,
    ForecastPoint, RegressionForecast, RegressionReport, StatisticsSummary,
};
pub use window::ObservationWindow;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
