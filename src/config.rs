//! Pipeline configuration

use crate::error::{PipelineError, Result};
use crate::preprocessing::TARGET_COLUMN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Locations and table names used by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw CSV export to load
    pub data_path: PathBuf,

    /// Pre-trained model artifact
    pub model_path: PathBuf,

    /// Directory backing the table store
    pub store_dir: PathBuf,

    /// Table holding normalized raw rows
    pub raw_table: String,

    /// Table holding the model-ready feature matrix
    pub transformed_table: String,

    /// Table holding scored rows
    pub predictions_table: String,

    /// Label column excluded from model inputs
    pub target_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: std::env::var("HOUSING_DATA_PATH")
                .unwrap_or_else(|_| "housing.csv".to_string())
                .into(),
            model_path: std::env::var("HOUSING_MODEL_PATH")
                .unwrap_or_else(|_| "model.json".to_string())
                .into(),
            store_dir: std::env::var("HOUSING_STORE_DIR")
                .unwrap_or_else(|_| "housing_data".to_string())
                .into(),
            raw_table: "housing_data".to_string(),
            transformed_table: "housing_data_transformed".to_string(),
            predictions_table: "housing_predictions".to_string(),
            target_column: TARGET_COLUMN.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| PipelineError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Builder method to set the raw data path
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Builder method to set the model artifact path
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Builder method to set the store directory
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// Builder method to set the target column
    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_table_names() {
        let config = PipelineConfig::default();
        assert_eq!(config.raw_table, "housing_data");
        assert_eq!(config.transformed_table, "housing_data_transformed");
        assert_eq!(config.predictions_table, "housing_predictions");
        assert_eq!(config.target_column, "median_house_value");
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::new()
            .with_data_path("in.csv")
            .with_model_path("m.json")
            .with_store_dir("/tmp/store");
        assert_eq!(config.data_path, PathBuf::from("in.csv"));
        assert_eq!(config.model_path, PathBuf::from("m.json"));
        assert_eq!(config.store_dir, PathBuf::from("/tmp/store"));
    }

    #[test]
    fn test_partial_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"model_path": "artifacts/model.json", "predictions_table": "scored"}}"#).unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.model_path, PathBuf::from("artifacts/model.json"));
        assert_eq!(config.predictions_table, "scored");
        assert_eq!(config.raw_table, "housing_data");
    }

    #[test]
    fn test_invalid_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(file.path()),
            Err(PipelineError::Config(_))
        ));
    }
}
