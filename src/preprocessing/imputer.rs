//! Median imputation of missing numeric values

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Median computed for one column during imputation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMedian {
    pub column: String,
    pub median: f64,
    /// Number of cells that were filled
    pub filled: usize,
}

/// Fit statistics returned alongside the imputed frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedianStats {
    pub columns: Vec<ColumnMedian>,
}

impl MedianStats {
    /// Median used for `column`, if it was imputed
    pub fn median(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.median)
    }

    /// Total number of cells filled across all columns
    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }
}

/// Median of a slice; even lengths average the two middle values
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Check if dtype can be imputed as a number
fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Null
    )
}

/// Fill every missing cell with its column's median.
///
/// All columns must be numeric. Nulls and `NaN` both count as missing. A
/// column with no present value fails with [`PipelineError::EmptyColumn`].
pub fn impute_median(df: &DataFrame) -> Result<(DataFrame, MedianStats)> {
    let mut stats = MedianStats::default();

    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            let series = col.as_materialized_series();
            let name = series.name().clone();

            if !is_numeric_dtype(series.dtype()) {
                return Err(PipelineError::DataError(format!(
                    "column '{}' is not numeric ({:?})",
                    name,
                    series.dtype()
                )));
            }

            let as_f64 = series.cast(&DataType::Float64)?;
            let ca = as_f64.f64()?;

            let present: Vec<f64> = ca.into_iter().flatten().filter(|v| !v.is_nan()).collect();
            let fill = median(&present)
                .ok_or_else(|| PipelineError::EmptyColumn(name.to_string()))?;

            let filled: Float64Chunked = ca
                .into_iter()
                .map(|opt| match opt {
                    Some(v) if !v.is_nan() => Some(v),
                    _ => Some(fill),
                })
                .collect();

            stats.columns.push(ColumnMedian {
                column: name.to_string(),
                median: fill,
                filled: ca.len() - present.len(),
            });

            Ok(Column::from(filled.with_name(name).into_series()))
        })
        .collect::<Result<Vec<Column>>>()?;

    Ok((DataFrame::new(columns)?, stats))
}
