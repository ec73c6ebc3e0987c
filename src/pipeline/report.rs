//! Outcome of a single pipeline run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage a run executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Raw CSV → normalized raw table
    Load,
    /// Raw table → transformed feature table
    Preprocess,
    /// Transformed table → predictions table
    Predict,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Preprocess => "preprocess",
            Stage::Predict => "predict",
        };
        f.write_str(name)
    }
}

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    /// Output table persisted
    Success { rows: usize, columns: usize },
    /// Nothing persisted; the error was logged
    Failed { error: String },
}

/// Report returned by every orchestrator run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub status: RunStatus,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, RunStatus::Success { .. })
    }

    /// Error text of a failed run
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            RunStatus::Failed { error } => Some(error),
            RunStatus::Success { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialize() {
        let status = RunStatus::Success { rows: 3, columns: 14 };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "success");
        assert_eq!(json["rows"], 3);

        let stage = serde_json::to_string(&Stage::Preprocess).unwrap();
        assert_eq!(stage, "\"preprocess\"");
    }

    #[test]
    fn test_report_error_accessor() {
        let report = RunReport {
            run_id: "abc".to_string(),
            stage: Stage::Predict,
            started_at: Utc::now(),
            elapsed_ms: 1,
            status: RunStatus::Failed {
                error: "boom".to_string(),
            },
        };
        assert!(!report.is_success());
        assert_eq!(report.error(), Some("boom"));
        assert_eq!(report.stage.to_string(), "predict");
    }
}
