//! Scoring an aligned feature table with a loaded model

use super::alignment::FeatureAligner;
use crate::error::{PipelineError, Result};
use crate::model::Model;
use crate::preprocessing::TARGET_COLUMN;
use polars::prelude::*;
use tracing::{debug, warn};

/// Column appended to scored tables
pub const PREDICTION_COLUMN: &str = "predicted_price";

/// Applies a model to a feature table and appends its scores
#[derive(Debug, Clone)]
pub struct Predictor {
    aligner: FeatureAligner,
    target_column: String,
}

impl Default for Predictor {
    fn default() -> Self {
        Self {
            aligner: FeatureAligner::default(),
            target_column: TARGET_COLUMN.to_string(),
        }
    }
}

impl Predictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the label column excluded from features
    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    /// Build the model input: aligned to the model's expected columns when it
    /// records them, otherwise every column except the label.
    pub fn select_features(&self, df: &DataFrame, model: &dyn Model) -> Result<DataFrame> {
        if let Some(expected) = model.expected_columns() {
            return Ok(self.aligner.align(df, expected)?.frame);
        }

        warn!("Model does not record expected columns, using table columns directly");
        let features = if df.column(&self.target_column).is_ok() {
            df.drop(&self.target_column)?
        } else {
            df.clone()
        };

        if features.width() == 0 {
            return Err(PipelineError::NoFeatureOverlap { expected: 0 });
        }
        Ok(features)
    }

    /// Score every row of `df`; one value per input row
    pub fn score(&self, df: &DataFrame, model: &dyn Model) -> Result<Vec<f64>> {
        let features = self.select_features(df, model)?;
        let scores = model.predict(&features)?;

        if scores.len() != df.height() {
            return Err(PipelineError::PredictionCountMismatch {
                expected: df.height(),
                actual: scores.len(),
            });
        }

        debug!(rows = scores.len(), features = features.width(), "Rows scored");
        Ok(scores)
    }

    /// `df` with a `predicted_price` column appended
    pub fn predict(&self, df: &DataFrame, model: &dyn Model) -> Result<DataFrame> {
        let scores = self.score(df, model)?;

        let mut output = df.clone();
        output.with_column(Column::new(PREDICTION_COLUMN.into(), scores))?;
        Ok(output)
    }
}
