//! Observation records and the variable vocabulary
//!
//! An [`Observation`] is one timestamped sensor reading. Every numeric field
//! is optional; a missing reading is stored as [`NA::NA`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::na::NA;

/// Recognised numeric fields of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Variable {
    Temperature,
    Humidity,
    WindSpeed,
    WindDirection,
    Pressure,
    Precipitation,
    SolarRadiation,
    UvIndex,
    Pm25,
    Pm10,
    Co2,
    O3,
    Feels,
    Soil,
    SoilHumidity,
    Gust,
}

impl Variable {
    /// Every recognised variable, in record order
    pub const ALL: [Variable; 16] = [
        Variable::Temperature,
        Variable::Humidity,
        Variable::WindSpeed,
        Variable::WindDirection,
        Variable::Pressure,
        Variable::Precipitation,
        Variable::SolarRadiation,
        Variable::UvIndex,
        Variable::Pm25,
        Variable::Pm10,
        Variable::Co2,
        Variable::O3,
        Variable::Feels,
        Variable::Soil,
        Variable::SoilHumidity,
        Variable::Gust,
    ];

    /// Variables summarised by `weather_statistics`
    pub const STATISTICS: [Variable; 9] = [
        Variable::Temperature,
        Variable::Humidity,
        Variable::WindSpeed,
        Variable::Pressure,
        Variable::Precipitation,
        Variable::SolarRadiation,
        Variable::UvIndex,
        Variable::Pm25,
        Variable::Pm10,
    ];

    /// Variables included in the correlation matrix
    pub const CORRELATION: [Variable; 5] = [
        Variable::Temperature,
        Variable::Humidity,
        Variable::WindSpeed,
        Variable::Pressure,
        Variable::Precipitation,
    ];

    /// Field name as it appears in records and result keys
    pub fn name(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            Variable::Humidity => "humidity",
            Variable::WindSpeed => "windSpeed",
            Variable::WindDirection => "windDirection",
            Variable::Pressure => "pressure",
            Variable::Precipitation => "precipitation",
            Variable::SolarRadiation => "solarRadiation",
            Variable::UvIndex => "uvIndex",
            Variable::Pm25 => "pm25",
            Variable::Pm10 => "pm10",
            Variable::Co2 => "co2",
            Variable::O3 => "o3",
            Variable::Feels => "feels",
            Variable::Soil => "soil",
            Variable::SoilHumidity => "soilHumidity",
            Variable::Gust => "gust",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Variable::ALL
            .iter()
            .copied()
            .find(|v| v.name() == s)
            .ok_or_else(|| Error::UnknownVariable(s.to_string()))
    }
}

/// One timestamped weather observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Time the observation was taken
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub temperature: NA<f64>,
    #[serde(default)]
    pub humidity: NA<f64>,
    #[serde(default)]
    pub wind_speed: NA<f64>,
    #[serde(default)]
    pub wind_direction: NA<f64>,
    #[serde(default)]
    pub pressure: NA<f64>,
    #[serde(default)]
    pub precipitation: NA<f64>,
    #[serde(default)]
    pub solar_radiation: NA<f64>,
    #[serde(default)]
    pub uv_index: NA<f64>,
    #[serde(default)]
    pub pm25: NA<f64>,
    #[serde(default)]
    pub pm10: NA<f64>,
    #[serde(default)]
    pub co2: NA<f64>,
    #[serde(default)]
    pub o3: NA<f64>,
    #[serde(default)]
    pub feels: NA<f64>,
    #[serde(default)]
    pub soil: NA<f64>,
    #[serde(default)]
    pub soil_humidity: NA<f64>,
    #[serde(default)]
    pub gust: NA<f64>,
}

impl Observation {
    /// Create an observation with every field missing
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Observation {
            timestamp,
            temperature: NA::NA,
            humidity: NA::NA,
            wind_speed: NA::NA,
            wind_direction: NA::NA,
            pressure: NA::NA,
            precipitation: NA::NA,
            solar_radiation: NA::NA,
            uv_index: NA::NA,
            pm25: NA::NA,
            pm10: NA::NA,
            co2: NA::NA,
            o3: NA::NA,
            feels: NA::NA,
            soil: NA::NA,
            soil_humidity: NA::NA,
            gust: NA::NA,
        }
    }

    /// Set a field, builder style
    pub fn with(mut self, variable: Variable, value: impl Into<NA<f64>>) -> Self {
        self.set(variable, value);
        self
    }

    /// Read a field
    pub fn get(&self, variable: Variable) -> NA<f64> {
        *self.slot(variable)
    }

    /// Overwrite a field
    pub fn set(&mut self, variable: Variable, value: impl Into<NA<f64>>) {
        *self.slot_mut(variable) = value.into();
    }

    fn slot(&self, variable: Variable) -> &NA<f64> {
        match variable {
            Variable::Temperature => &self.temperature,
            Variable::Humidity => &self.humidity,
            Variable::WindSpeed => &self.wind_speed,
            Variable::WindDirection => &self.wind_direction,
            Variable::Pressure => &self.pressure,
            Variable::Precipitation => &self.precipitation,
            Variable::SolarRadiation => &self.solar_radiation,
            Variable::UvIndex => &self.uv_index,
            Variable::Pm25 => &self.pm25,
            Variable::Pm10 => &self.pm10,
            Variable::Co2 => &self.co2,
            Variable::O3 => &self.o3,
            Variable::Feels => &self.feels,
            Variable::Soil => &self.soil,
            Variable::SoilHumidity => &self.soil_humidity,
            Variable::Gust => &self.gust,
        }
    }

    fn slot_mut(&mut self, variable: Variable) -> &mut NA<f64> {
        match variable {
            Variable::Temperature => &mut self.temperature,
            Variable::Humidity => &mut self.humidity,
            Variable::WindSpeed => &mut self.wind_speed,
            Variable::WindDirection => &mut self.wind_direction,
            Variable::Pressure => &mut self.pressure,
            Variable::Precipitation => &mut self.precipitation,
            Variable::SolarRadiation => &mut self.solar_radiation,
            Variable::UvIndex => &mut self.uv_index,
            Variable::Pm25 => &mut self.pm25,
            Variable::Pm10 => &mut self.pm10,
            Variable::Co2 => &mut self.co2,
            Variable::O3 => &mut self.o3,
            Variable::Feels => &mut self.feels,
            Variable::Soil => &mut self.soil,
            Variable::SoilHumidity => &mut self.soil_humidity,
            Variable::Gust => &mut self.gust,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_variable_names_roundtrip() {
        for variable in Variable::ALL {
            assert_eq!(variable.name().parse::<Variable>().unwrap(), variable);
        }
        assert!(matches!(
            "dewPoint".parse::<Variable>(),
            Err(Error::UnknownVariable(name)) if name == "dewPoint"
        ));
    }

    #[test]
    fn test_get_set() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut obs = Observation::new(ts).with(Variable::Pm25, 12.5);
        assert_eq!(obs.get(Variable::Pm25), NA::Value(12.5));
        assert!(obs.get(Variable::Pm10).is_na());

        obs.set(Variable::Pm25, NA::NA);
        assert!(obs.get(Variable::Pm25).is_na());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let json = r#"{"timestamp":"2024-06-01T12:00:00Z","temperature":21.5,"uvIndex":3,"pm25":null}"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.temperature, NA::Value(21.5));
        assert_eq!(obs.uv_index, NA::Value(3.0));
        assert!(obs.pm25.is_na());
        assert!(obs.humidity.is_na());
    }
}
