use thiserror::Error;

/// Error type for all analytics operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("No data: {0}")]
    EmptyData(String),

    #[error("Length mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Data format error: {0}")]
    Format(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),

    #[error("YAML error")]
    Yaml(#[source] serde_yaml::Error),

    #[error("TOML error")]
    Toml(#[source] toml::de::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means "not computable for this input" rather than
    /// a caller or I/O fault
    pub fn is_insufficient(&self) -> bool {
        matches!(self, Error::InsufficientData(_) | Error::EmptyData(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}
