//! Feature alignment against a model's expected inputs

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use tracing::debug;

/// Aligned frame plus a record of the drift that was reconciled
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Exactly the expected columns, in expected order
    pub frame: DataFrame,
    /// Expected columns that were absent and got filled
    pub filled: Vec<String>,
    /// Input columns that were not expected and got dropped
    pub dropped: Vec<String>,
}

/// Projects a feature table onto an expected column list
#[derive(Debug, Clone)]
pub struct FeatureAligner {
    fill_value: f64,
}

impl Default for FeatureAligner {
    fn default() -> Self {
        Self { fill_value: 0.0 }
    }
}

impl FeatureAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the value used for absent columns
    pub fn with_fill_value(mut self, value: f64) -> Self {
        self.fill_value = value;
        self
    }

    /// Keep expected columns present in `df`, create the absent ones filled
    /// with the fill value, drop the rest, and order as `expected`.
    ///
    /// Fails with [`PipelineError::NoFeatureOverlap`] when none of the
    /// expected columns exist in `df`.
    pub fn align(&self, df: &DataFrame, expected: &[String]) -> Result<Alignment> {
        let height = df.height();
        let mut filled = Vec::new();
        let mut columns = Vec::with_capacity(expected.len());

        for name in expected {
            match df.column(name) {
                Ok(col) => {
                    let series = col.as_materialized_series().cast(&DataType::Float64)?;
                    columns.push(Column::from(series));
                }
                Err(_) => {
                    filled.push(name.clone());
                    columns.push(Column::new(name.as_str().into(), vec![self.fill_value; height]));
                }
            }
        }

        if filled.len() == expected.len() {
            return Err(PipelineError::NoFeatureOverlap {
                expected: expected.len(),
            });
        }

        let dropped: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| !expected.contains(name))
            .collect();

        debug!(
            expected = expected.len(),
            filled = ?filled,
            dropped = ?dropped,
            "Features aligned"
        );

        Ok(Alignment {
            frame: DataFrame::new(columns)?,
            filled,
            dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("a".into(), &[1.0, 2.0, 3.0]),
            Column::new("b".into(), &[4.0, 5.0, 6.0]),
            Column::new("extra".into(), &[7.0, 8.0, 9.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_align_projects_pads_and_orders() {
        let expected = strings(&["b", "missing", "a"]);
        let alignment = FeatureAligner::new().align(&frame(), &expected).unwrap();

        let names: Vec<String> = alignment
            .frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, expected);
        assert_eq!(alignment.frame.height(), 3);
        assert_eq!(alignment.filled, strings(&["missing"]));
        assert_eq!(alignment.dropped, strings(&["extra"]));

        let missing = alignment.frame.column("missing").unwrap().f64().unwrap();
        assert!(missing.into_iter().all(|v| v == Some(0.0)));
        let b = alignment.frame.column("b").unwrap().f64().unwrap();
        assert_eq!(b.get(2), Some(6.0));
    }

    #[test]
    fn test_align_custom_fill_value() {
        let expected = strings(&["a", "z"]);
        let alignment = FeatureAligner::new()
            .with_fill_value(-1.0)
            .align(&frame(), &expected)
            .unwrap();
        let z = alignment.frame.column("z").unwrap().f64().unwrap();
        assert_eq!(z.get(0), Some(-1.0));
    }

    #[test]
    fn test_align_no_overlap() {
        let expected = strings(&["x", "y"]);
        let err = FeatureAligner::new().align(&frame(), &expected).unwrap_err();
        assert!(matches!(err, PipelineError::NoFeatureOverlap { expected: 2 }));
    }

    #[test]
    fn test_align_empty_target_is_no_overlap() {
        let err = FeatureAligner::new().align(&frame(), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::NoFeatureOverlap { expected: 0 }));
    }

    #[test]
    fn test_align_casts_integers() {
        let df = DataFrame::new(vec![Column::new("n".into(), &[1i64, 2])]).unwrap();
        let alignment = FeatureAligner::new().align(&df, &strings(&["n"])).unwrap();
        assert_eq!(alignment.frame.column("n").unwrap().dtype(), &DataType::Float64);
    }
}
