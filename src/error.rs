//! Error types for the housing pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Schema mismatch: expected {expected} columns, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Column '{0}' has no values, median is undefined")]
    EmptyColumn(String),

    #[error("No features matched between input data and model expectations ({expected} expected)")]
    NoFeatureOverlap { expected: usize },

    #[error("Mismatch between number of predictions ({actual}) and input rows ({expected})")]
    PredictionCountMismatch { expected: usize, actual: usize },

    #[error("Model artifact not found: {}", .0.display())]
    MissingModel(PathBuf),

    #[error("Source table not found: {0}")]
    MissingSourceTable(String),

    #[error("File not found: {}", .0.display())]
    SourceFileNotFound(PathBuf),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<polars::error::PolarsError> for PipelineError {
    fn from(err: polars::error::PolarsError) -> Self {
        PipelineError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}
