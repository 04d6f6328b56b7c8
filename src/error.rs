use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `EpidemicError` and maps to other errors to
/// convert to an `EpidemicError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum EpidemicError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    /// Every diagnostic collected while reading a community description.
    ConfigError(Vec<String>),
    EpidemicError(String),
}

impl From<io::Error> for EpidemicError {
    fn from(error: io::Error) -> Self {
        EpidemicError::IoError(error)
    }
}

impl From<serde_json::Error> for EpidemicError {
    fn from(error: serde_json::Error) -> Self {
        EpidemicError::JsonError(error)
    }
}

impl From<csv::Error> for EpidemicError {
    fn from(error: csv::Error) -> Self {
        EpidemicError::CSVError(error)
    }
}

impl From<String> for EpidemicError {
    fn from(error: String) -> Self {
        EpidemicError::EpidemicError(error)
    }
}

impl From<&str> for EpidemicError {
    fn from(error: &str) -> Self {
        EpidemicError::EpidemicError(error.to_string())
    }
}

impl std::error::Error for EpidemicError {}

impl Display for EpidemicError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EpidemicError::ConfigError(messages) => {
                write!(f, "Error: invalid community description")?;
                for message in messages {
                    write!(f, "\n  {message}")?;
                }
                Ok(())
            }
            EpidemicError::EpidemicError(message) => write!(f, "Error: {message}"),
            _ => write!(f, "Error: {self:?}"),
        }
    }
}
