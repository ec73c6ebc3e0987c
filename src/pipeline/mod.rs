//! Pipeline orchestration
//!
//! Two independent pipelines share one table store:
//! - preprocess: raw table → transformed table
//! - predict: model + transformed table → predictions table
//!
//! A load stage feeds the raw table from the CSV export. Every run ends in a
//! [`RunReport`]; failures are logged, never raised.

mod orchestrator;
mod report;

pub use orchestrator::HousingPipeline;
pub use report::{RunReport, RunStatus, Stage};
