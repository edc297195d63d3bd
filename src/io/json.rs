use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::observation::Observation;
use crate::window::ObservationWindow;

/// Read a window from a JSON file holding an array of observation records
pub fn read_window_json<P: AsRef<Path>>(path: P) -> Result<ObservationWindow> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let value: Value = serde_json::from_reader(reader)?;
    window_from_value(value)
}

/// Parse a window from a JSON array of observation records
pub fn parse_window_json(s: &str) -> Result<ObservationWindow> {
    let value: Value = serde_json::from_str(s)?;
    window_from_value(value)
}

/// Write a window as a JSON array of records
pub fn write_window_json<P: AsRef<Path>>(window: &ObservationWindow, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, window)?;
    Ok(())
}

fn window_from_value(value: Value) -> Result<ObservationWindow> {
    let records = match value {
        Value::Array(records) => records,
        _ => {
            return Err(Error::Format(
                "an observation window must be a JSON array of records".to_string(),
            ))
        }
    };

    let total = records.len();
    let observations: Vec<Observation> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match serde_json::from_value::<Observation>(record) {
            Ok(obs) => Some(obs),
            Err(e) => {
                log::warn!("skipping record {}: {}", i, e);
                None
            }
        })
        .collect();

    if observations.len() < total {
        log::warn!("read {} of {} records", observations.len(), total);
    }

    Ok(ObservationWindow::new(observations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::na::NA;

    #[test]
    fn test_parse_skips_bad_records() {
        let json = r#"[
            {"timestamp": "2024-01-01T00:00:00Z", "temperature": 20.5, "humidity": 60},
            {"timestamp": "not a time", "temperature": 21.0},
            {"timestamp": "2024-01-01T02:00:00Z", "temperature": null, "pm25": 8.1}
        ]"#;
        let window = parse_window_json(json).unwrap();

        assert_eq!(window.len(), 2);
        assert_eq!(window[0].temperature, NA::Value(20.5));
        assert_eq!(window[0].humidity, NA::Value(60.0));
        assert!(window[1].temperature.is_na());
        assert_eq!(window[1].pm25, NA::Value(8.1));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_window_json(r#"{"timestamp": "2024-01-01T00:00:00Z"}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(parse_window_json("[1, 2"), Err(Error::Json(_))));
    }
}
