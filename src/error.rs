use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConversionError>;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preferences error: {0}")]
    Preferences(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Could not load table {}: {message}", path.display())]
    TableLoad { path: PathBuf, message: String },

    #[error("Column error: {0}")]
    Column(String),

    #[error("{0}")]
    ValueParse(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Could not write output {}: {message}", path.display())]
    OutputWrite { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConversionError {
    pub fn output_write(path: impl Into<PathBuf>, source: impl std::fmt::Display) -> Self {
        ConversionError::OutputWrite {
            path: path.into(),
            message: source.to_string(),
        }
    }
}
