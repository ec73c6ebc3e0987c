//! Housing pipeline - batch preprocessing and scoring for housing data
//!
//! This crate loads a raw housing CSV export into a table store, turns it
//! into a model-ready feature table, scores it with a pre-trained
//! regression model and persists the predictions.
//!
//! # Modules
//!
//! ## Pipeline
//! - [`preprocessing`] - Schema normalization, one-hot encoding, median imputation
//! - [`inference`] - Feature alignment and scoring
//! - [`model`] - Model trait and JSON linear model artifacts
//! - [`pipeline`] - Stage orchestration and run reports
//!
//! ## Infrastructure
//! - [`storage`] - Named-table stores (parquet files, in-memory)
//! - [`config`] - Paths and table names
//!
//! ## Services
//! - [`server`] - HTTP triggers and prediction retrieval
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;
pub mod config;

// Pipeline
pub mod preprocessing;
pub mod model;
pub mod inference;
pub mod pipeline;

// Infrastructure
pub mod storage;

// Services
pub mod server;
pub mod cli;

pub use error::{PipelineError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PipelineError, Result};

    // Configuration
    pub use crate::config::PipelineConfig;

    // Preprocessing
    pub use crate::preprocessing::{HousingPreprocessor, PreprocessOutput, CANONICAL_COLUMNS};

    // Model
    pub use crate::model::{JsonModelLoader, LinearModel, Model, ModelLoader};

    // Inference
    pub use crate::inference::{FeatureAligner, Predictor, PREDICTION_COLUMN};

    // Pipeline
    pub use crate::pipeline::{HousingPipeline, RunReport, RunStatus, Stage};

    // Storage
    pub use crate::storage::{MemoryTableStore, ParquetTableStore, TableConnection, TableStore};
}
