//! Linear regression artifact stored as JSON

use super::{frame_to_array2, Model, ModelLoader};
use crate::error::{PipelineError, Result};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Fitted linear regression: `y = X · coefficients + intercept`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Column names seen at fit time, in coefficient order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// One weight per feature
    pub coefficients: Vec<f64>,
    /// Bias term
    #[serde(default)]
    pub intercept: f64,
}

impl LinearModel {
    /// Create a model without recorded feature names
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_names: None,
            coefficients,
            intercept,
        }
    }

    /// Builder method to record fit-time feature names
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    /// Check internal consistency of the artifact
    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(PipelineError::InvalidModel("no coefficients".to_string()));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.coefficients.len() {
                return Err(PipelineError::InvalidModel(format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    self.coefficients.len()
                )));
            }
        }
        Ok(())
    }

    /// Write the artifact as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Model for LinearModel {
    fn expected_columns(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &DataFrame) -> Result<Vec<f64>> {
        if features.width() != self.coefficients.len() {
            return Err(PipelineError::InvalidModel(format!(
                "model has {} coefficients, table has {} columns",
                self.coefficients.len(),
                features.width()
            )));
        }

        let x = frame_to_array2(features)?;
        let weights = Array1::from(self.coefficients.clone());
        let scores = x.dot(&weights) + self.intercept;

        Ok(scores.to_vec())
    }
}

/// Loads [`LinearModel`] artifacts from JSON files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelLoader;

impl ModelLoader for JsonModelLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn Model>> {
        if !path.exists() {
            return Err(PipelineError::MissingModel(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let model: LinearModel = serde_json::from_str(&contents)?;
        model.validate()?;

        debug!(
            path = %path.display(),
            n_features = model.coefficients.len(),
            has_feature_names = model.feature_names.is_some(),
            "Model artifact loaded"
        );
        Ok(Box::new(model))
    }
}
