use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::Result;
use crate::observation::Observation;
use crate::window::ObservationWindow;

/// Read a window from a headered CSV file. Column names are the record keys
/// (`timestamp`, `temperature`, `windSpeed`, ...); an empty cell is a
/// missing value.
pub fn read_window_csv<P: AsRef<Path>>(path: P) -> Result<ObservationWindow> {
    let file = File::open(path.as_ref())?;
    read_window_csv_from_reader(file)
}

/// Read a window from any CSV source
pub fn read_window_csv_from_reader<R: Read>(reader: R) -> Result<ObservationWindow> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    // Header problems are fatal; row problems only skip the row
    rdr.headers()?;

    let mut observations = Vec::new();
    for (i, row) in rdr.deserialize::<Observation>().enumerate() {
        match row {
            Ok(obs) => observations.push(obs),
            Err(e) => log::warn!("skipping CSV row {}: {}", i + 1, e),
        }
    }

    Ok(ObservationWindow::new(observations))
}
