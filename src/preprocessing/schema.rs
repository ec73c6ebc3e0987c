//! Canonical housing schema and raw-table normalization

use crate::error::{PipelineError, Result};
use polars::prelude::*;

/// Canonical column names, in the positional order of the raw input
pub const CANONICAL_COLUMNS: [&str; 11] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
    "median_house_value",
    "ocean_proximity",
    "agency",
];

/// The single categorical field of the canonical schema
pub const CATEGORICAL_COLUMN: &str = "ocean_proximity";

/// Source tag carried by raw rows, dropped before encoding
pub const AGENCY_COLUMN: &str = "agency";

/// Label column, never fed to the model as a feature
pub const TARGET_COLUMN: &str = "median_house_value";

/// Literal token the raw exports use for missing cells
pub const NULL_TOKEN: &str = "Null";

/// Whether `name` is one of the numeric canonical fields
pub fn is_numeric_field(name: &str) -> bool {
    name != CATEGORICAL_COLUMN
        && name != AGENCY_COLUMN
        && CANONICAL_COLUMNS.contains(&name)
}

/// Rename a raw table's columns positionally to the canonical schema.
///
/// The raw table is left untouched; a renamed copy is returned. Values and
/// row count are carried over as-is.
pub fn normalize_schema(raw: &DataFrame) -> Result<DataFrame> {
    if raw.width() != CANONICAL_COLUMNS.len() {
        return Err(PipelineError::SchemaMismatch {
            expected: CANONICAL_COLUMNS.len(),
            actual: raw.width(),
        });
    }

    let columns: Vec<Column> = raw
        .get_columns()
        .iter()
        .zip(CANONICAL_COLUMNS)
        .map(|(col, name)| {
            Column::from(col.as_materialized_series().clone().with_name(name.into()))
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Turn `"Null"` tokens into real nulls and coerce numeric canonical fields
/// to `Float64`. Cells that cannot be parsed as numbers become null.
pub fn clean_values(df: &DataFrame) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            let series = col.as_materialized_series();
            let name = series.name().clone();

            let series = if series.dtype() == &DataType::String {
                let ca = series.str()?;
                let cleaned: StringChunked = ca
                    .into_iter()
                    .map(|v| v.filter(|s| s.trim() != NULL_TOKEN))
                    .collect();
                cleaned.with_name(name.clone()).into_series()
            } else {
                series.clone()
            };

            let series = if is_numeric_field(name.as_str()) {
                series.cast(&DataType::Float64)?
            } else {
                series
            };

            Ok(Column::from(series))
        })
        .collect::<Result<Vec<Column>>>()?;

    Ok(DataFrame::new(columns)?)
}
