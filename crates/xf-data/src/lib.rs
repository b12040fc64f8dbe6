//! Dataset ingestion for the linked-views platform
//!
//! Reads tabular sources once at startup and hands the engine a finalized,
//! immutable [`xf_core::Dataset`].

pub mod config;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use config::{ColumnSpec, ColumnType, DatasetConfig, NullConfig, RowFilter};
pub use sources::CsvLoader;

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Delimiter '{0}' is not a single-byte ASCII character")]
    InvalidDelimiter(char),

    #[error("Column '{0}' not found in source headers")]
    MissingColumn(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
