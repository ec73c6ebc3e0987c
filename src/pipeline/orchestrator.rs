//! Stage sequencing over a shared table store

use super::report::{RunReport, RunStatus, Stage};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::inference::Predictor;
use crate::model::{JsonModelLoader, ModelLoader};
use crate::preprocessing::{
    normalize_schema, one_hot_encode, pad_known_categories, HousingPreprocessor,
    CATEGORICAL_COLUMN, NULL_TOKEN,
};
use crate::storage::{ParquetTableStore, TableStore};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Housing pipeline: load, preprocess and predict stages over one store.
///
/// Each stage opens its own store connection, which is released on every
/// exit path. Stage failures are logged and returned as a failed
/// [`RunReport`]; nothing is written for a failed stage.
pub struct HousingPipeline {
    config: PipelineConfig,
    store: Arc<dyn TableStore>,
    loader: Arc<dyn ModelLoader>,
    preprocessor: HousingPreprocessor,
    predictor: Predictor,
}

impl std::fmt::Debug for HousingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HousingPipeline")
            .field("config", &self.config)
            .field("store", &self.store.describe())
            .finish()
    }
}

impl HousingPipeline {
    /// Pipeline backed by parquet files in `config.store_dir` and JSON model artifacts
    pub fn new(config: PipelineConfig) -> Self {
        let store = Arc::new(ParquetTableStore::new(config.store_dir.clone()));
        Self::with_components(config, store, Arc::new(JsonModelLoader))
    }

    /// Pipeline with explicit storage and model collaborators
    pub fn with_components(
        config: PipelineConfig,
        store: Arc<dyn TableStore>,
        loader: Arc<dyn ModelLoader>,
    ) -> Self {
        let predictor = Predictor::new().with_target_column(config.target_column.clone());
        Self {
            config,
            store,
            loader,
            preprocessor: HousingPreprocessor::new(),
            predictor,
        }
    }

    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    /// Read the raw CSV, normalize its schema and replace the raw table
    pub fn load_raw_data(&self) -> RunReport {
        self.execute(Stage::Load, || {
            let path = &self.config.data_path;
            if !path.exists() {
                return Err(PipelineError::SourceFileNotFound(path.clone()));
            }

            info!(path = %path.display(), "Loading raw data");
            // Infer dtypes from every row
            let raw = CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(None)
                .with_parse_options(CsvParseOptions::default().with_null_values(Some(
                    NullValues::AllColumnsSingle(NULL_TOKEN.into()),
                )))
                .try_into_reader_with_file_path(Some(path.clone()))?
                .finish()?;
            let normalized = normalize_schema(&raw)?;

            let mut conn = self.store.open()?;
            conn.write_replace(&self.config.raw_table, &normalized)?;
            Ok(normalized.shape())
        })
    }

    /// Raw table → normalize → encode → pad → impute → transformed table
    pub fn preprocess(&self) -> RunReport {
        self.execute(Stage::Preprocess, || {
            let mut conn = self.store.open()?;
            let raw = conn.read_all(&self.config.raw_table)?;

            let output = self.preprocessor.transform(&raw)?;

            conn.write_replace(&self.config.transformed_table, &output.frame)?;
            Ok(output.frame.shape())
        })
    }

    /// Load model → read transformed table → align → score → predictions table
    pub fn generate_predictions(&self) -> RunReport {
        self.execute(Stage::Predict, || {
            info!(path = %self.config.model_path.display(), "Loading model for predictions");
            let model = self.loader.load(&self.config.model_path)?;

            let mut conn = self.store.open()?;
            let data = conn.read_all(&self.config.transformed_table)?;

            let predictions = self.predictor.predict(&data, model.as_ref())?;

            conn.write_replace(&self.config.predictions_table, &predictions)?;
            Ok(predictions.shape())
        })
    }

    /// Load, preprocess and predict in order. Every stage runs, even after a
    /// failure, each against whatever its source table currently holds.
    pub fn run_all(&self) -> Vec<RunReport> {
        vec![
            self.load_raw_data(),
            self.preprocess(),
            self.generate_predictions(),
        ]
    }

    /// Every persisted prediction row
    pub fn fetch_predictions(&self) -> Result<DataFrame> {
        let conn = self.store.open()?;
        conn.read_all(&self.config.predictions_table)
    }

    /// Score a fixed three-row sample and log each prediction
    pub fn sample_predictions(&self) -> Result<Vec<f64>> {
        info!("Running test predictions for sample data");
        let model = self.loader.load(&self.config.model_path)?;

        let encoded = one_hot_encode(&sample_frame()?, CATEGORICAL_COLUMN)?;
        let features = pad_known_categories(&encoded.frame, CATEGORICAL_COLUMN)?;
        let scores = self.predictor.score(&features, model.as_ref())?;

        for (i, score) in scores.iter().enumerate() {
            info!(sample = i + 1, prediction = score, "Sample prediction");
        }
        Ok(scores)
    }

    fn execute<F>(&self, stage: Stage, run: F) -> RunReport
    where
        F: FnOnce() -> Result<(usize, usize)>,
    {
        let run_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        let started_at = chrono::Utc::now();
        let start = Instant::now();
        info!(run_id = %run_id, stage = %stage, store = %self.store.describe(), "Stage started");

        let status = match run() {
            Ok((rows, columns)) => {
                info!(
                    run_id = %run_id,
                    stage = %stage,
                    rows,
                    columns,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Stage succeeded"
                );
                RunStatus::Success { rows, columns }
            }
            Err(e) => {
                error!(run_id = %run_id, stage = %stage, error = %e, "Stage failed");
                RunStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        RunReport {
            run_id,
            stage,
            started_at,
            elapsed_ms: start.elapsed().as_millis() as u64,
            status,
        }
    }
}

/// Three unlabeled rows covering NEAR OCEAN, INLAND and <1H OCEAN
fn sample_frame() -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Column::new("longitude".into(), &[-122.64, -115.73, -117.96]),
        Column::new("latitude".into(), &[38.01, 33.35, 33.89]),
        Column::new("housing_median_age".into(), &[36.0, 23.0, 24.0]),
        Column::new("total_rooms".into(), &[1336.0, 1586.0, 1332.0]),
        Column::new("total_bedrooms".into(), &[258.0, 448.0, 252.0]),
        Column::new("population".into(), &[678.0, 338.0, 625.0]),
        Column::new("households".into(), &[249.0, 182.0, 230.0]),
        Column::new("median_income".into(), &[5.5789, 1.2132, 4.4375]),
        Column::new(
            CATEGORICAL_COLUMN.into(),
            &["NEAR OCEAN", "INLAND", "<1H OCEAN"],
        ),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearModel, Model};
    use crate::preprocessing::CANONICAL_COLUMNS;
    use crate::storage::MemoryTableStore;
    use std::path::Path;

    struct StaticLoader(LinearModel);

    impl ModelLoader for StaticLoader {
        fn load(&self, _path: &Path) -> Result<Box<dyn Model>> {
            Ok(Box::new(self.0.clone()))
        }
    }

    fn raw_table() -> DataFrame {
        let mut columns: Vec<Column> = CANONICAL_COLUMNS[..9]
            .iter()
            .map(|name| Column::new((*name).into(), &[Some(1.0), None, Some(3.0)]))
            .collect();
        columns.push(Column::new(CATEGORICAL_COLUMN.into(), &["INLAND", "ISLAND", "INLAND"]));
        columns.push(Column::new("agency".into(), &["x", "y", "z"]));
        DataFrame::new(columns).unwrap()
    }

    fn pipeline_with(model: LinearModel) -> (HousingPipeline, Arc<MemoryTableStore>) {
        let store = Arc::new(MemoryTableStore::new());
        let pipeline = HousingPipeline::with_components(
            PipelineConfig::default(),
            store.clone(),
            Arc::new(StaticLoader(model)),
        );
        (pipeline, store)
    }

    fn seed_raw(store: &MemoryTableStore) {
        let mut conn = store.open().unwrap();
        conn.write_replace("housing_data", &raw_table()).unwrap();
    }

    #[test]
    fn test_preprocess_then_predict() {
        let model = LinearModel::new(vec![1.0, 100.0], 0.0).with_feature_names(vec![
            "median_income".to_string(),
            "ocean_proximity_ISLAND".to_string(),
        ]);
        let (pipeline, store) = pipeline_with(model);
        seed_raw(&store);

        let report = pipeline.preprocess();
        assert!(report.is_success(), "{:?}", report.error());
        assert_eq!(report.status, RunStatus::Success { rows: 3, columns: 14 });

        let report = pipeline.generate_predictions();
        assert!(report.is_success(), "{:?}", report.error());

        let predictions = pipeline.fetch_predictions().unwrap();
        let scores = predictions.column("predicted_price").unwrap().f64().unwrap();
        // Row 1: median_income imputed to 2.0, ISLAND indicator set
        assert_eq!(scores.into_iter().collect::<Vec<_>>(), vec![Some(1.0), Some(102.0), Some(3.0)]);
    }

    #[test]
    fn test_preprocess_missing_source_writes_nothing() {
        let (pipeline, store) = pipeline_with(LinearModel::new(vec![1.0], 0.0));

        let report = pipeline.preprocess();
        assert!(!report.is_success());
        assert!(report.error().unwrap().contains("housing_data"));
        assert!(store.table_names().is_empty());
    }

    #[test]
    fn test_failed_predict_keeps_previous_table() {
        let model = LinearModel::new(vec![1.0], 0.0)
            .with_feature_names(vec!["median_income".to_string()]);
        let (pipeline, store) = pipeline_with(model);
        seed_raw(&store);
        assert!(pipeline.preprocess().is_success());
        assert!(pipeline.generate_predictions().is_success());
        let before = pipeline.fetch_predictions().unwrap();

        // Rewrite the transformed table with nothing the model expects
        {
            let mut conn = store.open().unwrap();
            let unrelated = DataFrame::new(vec![Column::new("other".into(), &[1.0])]).unwrap();
            conn.write_replace("housing_data_transformed", &unrelated).unwrap();
        }

        let report = pipeline.generate_predictions();
        assert!(!report.is_success());
        assert!(pipeline.fetch_predictions().unwrap().equals_missing(&before));
    }

    #[test]
    fn test_sample_predictions() {
        let model = LinearModel::new(vec![1.0, 10.0], 0.0).with_feature_names(vec![
            "median_income".to_string(),
            "ocean_proximity_INLAND".to_string(),
        ]);
        let (pipeline, _) = pipeline_with(model);

        let scores = pipeline.sample_predictions().unwrap();
        assert_eq!(scores.len(), 3);
        assert!((scores[0] - 5.5789).abs() < 1e-9);
        assert!((scores[1] - 11.2132).abs() < 1e-9);
    }

    #[test]
    fn test_sample_frame_shape() {
        let sample = sample_frame().unwrap();
        assert_eq!(sample.shape(), (3, 9));
    }
}
