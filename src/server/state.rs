//! Application state management

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::pipeline::HousingPipeline;

/// Application state shared across handlers
pub struct AppState {
    pub pipeline: Arc<HousingPipeline>,
    /// Held for the duration of a stage run; one stage at a time
    pub run_lock: Mutex<()>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(pipeline: HousingPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            run_lock: Mutex::new(()),
            started_at: chrono::Utc::now(),
        }
    }
}
