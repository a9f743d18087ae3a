use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read input file '{0}'")]
    InputFile(PathBuf, #[source] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{file} is missing required column '{column}'")]
    MissingColumn { file: String, column: String },

    #[error("Data integrity failure: {0}")]
    Integrity(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),
}

impl ProcessingError {
    /// Configuration and integrity failures abort the run before any output is written.
    pub fn is_fatal_data_error(&self) -> bool {
        matches!(
            self,
            ProcessingError::Config(_)
                | ProcessingError::MissingColumn { .. }
                | ProcessingError::Integrity(_)
        )
    }
}
