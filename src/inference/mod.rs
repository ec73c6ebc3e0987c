//! Inference module
//!
//! Reconciles a feature table with what a model was trained on and scores it:
//! - Feature alignment (project, pad, reorder) against expected columns
//! - Label exclusion when the model records no expected columns
//! - Row-count checked scoring with a `predicted_price` column appended

mod alignment;
mod predictor;

pub use alignment::{Alignment, FeatureAligner};
pub use predictor::{Predictor, PREDICTION_COLUMN};
