//! Pre-trained model artifacts
//!
//! A model is consumed, never trained, here. The [`Model`] trait is the
//! seam between the pipeline and whatever artifact format backs it; the
//! expected-column list is an optional capability, not a requirement.

mod linear;

pub use linear::{JsonModelLoader, LinearModel};

use crate::error::{PipelineError, Result};
use ndarray::Array2;
use polars::prelude::*;
use std::path::Path;

/// A loaded regression model
pub trait Model: Send + Sync {
    /// Ordered input columns the model was fitted on, when it records them
    fn expected_columns(&self) -> Option<&[String]>;

    /// Score every row of `features`, one value per row
    fn predict(&self, features: &DataFrame) -> Result<Vec<f64>>;
}

/// Loads a [`Model`] from a path
pub trait ModelLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Box<dyn Model>>;
}

/// Copy every column of `df` into a row-major `Array2<f64>`.
/// Nulls are read as `0.0`.
pub fn frame_to_array2(df: &DataFrame) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = df.width();

    let col_data: Vec<Vec<f64>> = df
        .get_columns()
        .iter()
        .map(|col| {
            let as_f64 = col
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| PipelineError::DataError(e.to_string()))?;
            let values: Vec<f64> = as_f64
                .f64()
                .map_err(|e| PipelineError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect();
            Ok(values)
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_data[c][r]))
}
