//! Error types for export and reporting.

use std::path::PathBuf;

use thiserror::Error;

use ist_model::OutputField;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field {0} is numeric and has no frequency table")]
    NotCategorical(OutputField),
}

pub type Result<T> = std::result::Result<T, ReportError>;
