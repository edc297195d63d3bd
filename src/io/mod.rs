//! Loading observation windows from files
//!
//! Both loaders keep records in file order. A record that cannot be read
//! (bad timestamp, non-numeric value) is skipped with a warning instead of
//! failing the whole window.

pub mod csv;
pub mod json;

pub use self::csv::{read_window_csv, read_window_csv_from_reader};
pub use self::json::{parse_window_json, read_window_json, write_window_json};
