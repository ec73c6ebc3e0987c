//! Data preprocessing module
//!
//! Turns raw housing rows into a numeric feature table:
//! - Positional normalization to the canonical schema
//! - `"Null"` token cleaning and numeric coercion
//! - One-hot encoding of `ocean_proximity`, padded to the known categories
//! - Median imputation of missing cells

pub mod schema;
mod encoder;
mod imputer;
mod pipeline;

pub use schema::{
    clean_values, is_numeric_field, normalize_schema, AGENCY_COLUMN, CANONICAL_COLUMNS,
    CATEGORICAL_COLUMN, NULL_TOKEN, TARGET_COLUMN,
};
pub use encoder::{
    indicator_name, known_indicator_names, one_hot_encode, pad_known_categories,
    OneHotEncoding, KNOWN_CATEGORIES,
};
pub use imputer::{impute_median, median, ColumnMedian, MedianStats};
pub use pipeline::{HousingPreprocessor, PreprocessOutput};
