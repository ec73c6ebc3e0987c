//! One-hot encoding of the categorical housing field

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::collections::HashSet;

/// Category values the trained models know about
pub const KNOWN_CATEGORIES: [&str; 5] = [
    "<1H OCEAN",
    "INLAND",
    "ISLAND",
    "NEAR BAY",
    "NEAR OCEAN",
];

/// Name of the indicator column for `category` of `column`
pub fn indicator_name(column: &str, category: &str) -> String {
    format!("{}_{}", column, category)
}

/// Indicator columns for every known category, in canonical order
pub fn known_indicator_names(column: &str) -> Vec<String> {
    KNOWN_CATEGORIES
        .iter()
        .map(|category| indicator_name(column, category))
        .collect()
}

/// Output of [`one_hot_encode`]
#[derive(Debug, Clone)]
pub struct OneHotEncoding {
    /// Input frame with the categorical column replaced by indicators
    pub frame: DataFrame,
    /// Distinct observed categories, in first-appearance order
    pub categories: Vec<String>,
}

impl OneHotEncoding {
    /// Observed categories outside [`KNOWN_CATEGORIES`]
    pub fn unknown_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(String::as_str)
            .filter(|c| !KNOWN_CATEGORIES.contains(c))
            .collect()
    }
}

/// Replace `column` with one `Float64` indicator per distinct observed value.
///
/// Indicators are appended after the remaining columns, ordered by first
/// appearance. Null cells set no indicator.
pub fn one_hot_encode(df: &DataFrame, column: &str) -> Result<OneHotEncoding> {
    let source = df
        .column(column)
        .map_err(|_| PipelineError::ColumnNotFound(column.to_string()))?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values: Vec<Option<&str>> = source.str()?.into_iter().collect();

    let mut seen = HashSet::new();
    let categories: Vec<String> = values
        .iter()
        .flatten()
        .filter(|v| seen.insert(**v))
        .map(|v| v.to_string())
        .collect();

    let mut frame = df.drop(column)?;
    for category in &categories {
        let indicator: Vec<f64> = values
            .iter()
            .map(|v| if *v == Some(category.as_str()) { 1.0 } else { 0.0 })
            .collect();
        frame.with_column(Column::new(indicator_name(column, category).into(), indicator))?;
    }

    Ok(OneHotEncoding { frame, categories })
}

/// Add an all-zero indicator for each known category missing from `df`
pub fn pad_known_categories(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let mut frame = df.clone();
    let height = frame.height();

    for name in known_indicator_names(column) {
        if frame.column(&name).is_err() {
            frame.with_column(Column::new(name.into(), vec![0.0f64; height]))?;
        }
    }

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proximity_frame(values: &[Option<&str>]) -> DataFrame {
        let n = values.len();
        DataFrame::new(vec![
            Column::new("median_income".into(), (0..n).map(|i| i as f64).collect::<Vec<f64>>()),
            Column::new("ocean_proximity".into(), values.to_vec()),
        ])
        .unwrap()
    }

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_first_appearance_order() {
        let df = proximity_frame(&[Some("INLAND"), Some("NEAR BAY"), Some("INLAND")]);
        let encoded = one_hot_encode(&df, "ocean_proximity").unwrap();

        assert_eq!(encoded.categories, vec!["INLAND", "NEAR BAY"]);
        assert_eq!(
            names(&encoded.frame),
            vec!["median_income", "ocean_proximity_INLAND", "ocean_proximity_NEAR BAY"]
        );

        let inland = encoded.frame.column("ocean_proximity_INLAND").unwrap().f64().unwrap();
        assert_eq!(inland.into_iter().collect::<Vec<_>>(), vec![Some(1.0), Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_encode_null_sets_no_indicator() {
        let df = proximity_frame(&[Some("ISLAND"), None]);
        let encoded = one_hot_encode(&df, "ocean_proximity").unwrap();

        assert_eq!(encoded.categories, vec!["ISLAND"]);
        let island = encoded.frame.column("ocean_proximity_ISLAND").unwrap().f64().unwrap();
        assert_eq!(island.get(1), Some(0.0));
    }

    #[test]
    fn test_encode_missing_column() {
        let df = proximity_frame(&[Some("INLAND")]);
        let err = one_hot_encode(&df, "not_there").unwrap_err();
        assert!(matches!(err, PipelineError::ColumnNotFound(_)));
    }

    #[test]
    fn test_unknown_categories_tolerated() {
        let df = proximity_frame(&[Some("LAGOON"), Some("INLAND")]);
        let encoded = one_hot_encode(&df, "ocean_proximity").unwrap();

        assert_eq!(encoded.unknown_categories(), vec!["LAGOON"]);
        assert!(encoded.frame.column("ocean_proximity_LAGOON").is_ok());
    }

    #[test]
    fn test_pad_known_categories() {
        let df = proximity_frame(&[Some("NEAR OCEAN"), Some("INLAND"), Some("<1H OCEAN")]);
        let encoded = one_hot_encode(&df, "ocean_proximity").unwrap();
        let padded = pad_known_categories(&encoded.frame, "ocean_proximity").unwrap();

        assert_eq!(padded.width(), 1 + KNOWN_CATEGORIES.len());
        for name in ["ocean_proximity_ISLAND", "ocean_proximity_NEAR BAY"] {
            let col = padded.column(name).unwrap().f64().unwrap();
            assert!(col.into_iter().all(|v| v == Some(0.0)), "{} should be all zero", name);
        }

        // Exactly one indicator set per row
        for row in 0..padded.height() {
            let total: f64 = known_indicator_names("ocean_proximity")
                .iter()
                .map(|n| padded.column(n).unwrap().f64().unwrap().get(row).unwrap())
                .sum();
            assert_eq!(total, 1.0);
        }
    }

    #[test]
    fn test_pad_keeps_existing_indicators() {
        let df = proximity_frame(&[Some("ISLAND")]);
        let encoded = one_hot_encode(&df, "ocean_proximity").unwrap();
        let padded = pad_known_categories(&encoded.frame, "ocean_proximity").unwrap();

        let island = padded.column("ocean_proximity_ISLAND").unwrap().f64().unwrap();
        assert_eq!(island.get(0), Some(1.0));
    }
}
