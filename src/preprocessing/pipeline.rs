//! Raw housing table → model-ready feature table

use super::{
    encoder::{one_hot_encode, pad_known_categories},
    imputer::{impute_median, MedianStats},
    schema::{clean_values, normalize_schema, AGENCY_COLUMN, CATEGORICAL_COLUMN},
};
use crate::error::Result;
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

/// Result of one preprocessing pass
#[derive(Debug, Clone)]
pub struct PreprocessOutput {
    /// Fully numeric feature table, no missing cells
    pub frame: DataFrame,
    /// Observed categories, in first-appearance order
    pub categories: Vec<String>,
    /// Observed categories outside the known set
    pub unknown_categories: Vec<String>,
    /// Medians used to fill missing cells
    pub medians: MedianStats,
}

/// Stateless transform: normalize → clean → encode → pad → impute.
///
/// Every call fits its statistics on the batch it is given; nothing is
/// carried between calls.
#[derive(Debug, Clone)]
pub struct HousingPreprocessor {
    categorical_column: String,
    drop_columns: Vec<String>,
}

impl Default for HousingPreprocessor {
    fn default() -> Self {
        Self {
            categorical_column: CATEGORICAL_COLUMN.to_string(),
            drop_columns: vec![AGENCY_COLUMN.to_string()],
        }
    }
}

impl HousingPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full transform on a raw (or already normalized) table
    pub fn transform(&self, raw: &DataFrame) -> Result<PreprocessOutput> {
        let start = Instant::now();

        let normalized = normalize_schema(raw)?;
        let mut cleaned = clean_values(&normalized)?;
        for column in &self.drop_columns {
            if cleaned.column(column).is_ok() {
                cleaned = cleaned.drop(column)?;
            }
        }
        debug!(rows = cleaned.height(), "Schema normalized");

        let encoded = one_hot_encode(&cleaned, &self.categorical_column)?;
        let unknown_categories: Vec<String> = encoded
            .unknown_categories()
            .into_iter()
            .map(String::from)
            .collect();
        if !unknown_categories.is_empty() {
            warn!(
                categories = ?unknown_categories,
                "Unknown categories encoded; they are dropped at alignment unless the model expects them"
            );
        }

        let padded = pad_known_categories(&encoded.frame, &self.categorical_column)?;
        let (frame, medians) = impute_median(&padded)?;
        debug!(
            columns = frame.width(),
            filled = medians.total_filled(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Encoding and imputation complete"
        );

        Ok(PreprocessOutput {
            frame,
            categories: encoded.categories,
            unknown_categories,
            medians,
        })
    }
}
