//! HTTP request handlers

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, Json};
use polars::prelude::*;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::pipeline::{HousingPipeline, RunReport, RunStatus};

use super::error::{Result, ServerError};
use super::state::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime.num_seconds(),
    }))
}

/// Trigger the preprocess pipeline
pub async fn run_preprocessing(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>)> {
    let report = run_stage(&state, |pipeline| pipeline.preprocess()).await?;
    Ok(stage_response(
        report,
        "Data preprocessed successfully",
        "Data preprocessing failed",
    ))
}

/// Trigger the prediction pipeline
pub async fn generate_predictions(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>)> {
    let report = run_stage(&state, |pipeline| pipeline.generate_predictions()).await?;
    Ok(stage_response(
        report,
        "Predictions generated successfully",
        "Prediction generation failed",
    ))
}

/// Every persisted prediction, one JSON object per row
pub async fn get_predictions(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let _guard = state.run_lock.lock().await;
    let pipeline = Arc::clone(&state.pipeline);

    let frame = tokio::task::spawn_blocking(move || pipeline.fetch_predictions())
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    info!(rows = frame.height(), "Serving predictions");
    Ok(Json(Value::Array(
        frame_to_records(&frame).into_iter().map(Value::Object).collect(),
    )))
}

/// Run one stage on the blocking pool while holding the run lock
async fn run_stage<F>(state: &AppState, stage: F) -> Result<RunReport>
where
    F: FnOnce(&HousingPipeline) -> RunReport + Send + 'static,
{
    let _guard = state.run_lock.lock().await;
    let pipeline = Arc::clone(&state.pipeline);

    tokio::task::spawn_blocking(move || stage(&pipeline))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
}

fn stage_response(report: RunReport, ok_message: &str, failed_message: &str) -> (StatusCode, Json<Value>) {
    match &report.status {
        RunStatus::Success { rows, columns } => (
            StatusCode::OK,
            Json(json!({
                "status": ok_message,
                "run_id": report.run_id,
                "rows": rows,
                "columns": columns,
                "elapsed_ms": report.elapsed_ms,
            })),
        ),
        RunStatus::Failed { error } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": failed_message,
                "run_id": report.run_id,
                "error": error,
            })),
        ),
    }
}

/// Convert a frame into row records (column name → value)
pub fn frame_to_records(df: &DataFrame) -> Vec<Map<String, Value>> {
    let columns = df.get_columns();

    (0..df.height())
        .map(|i| {
            columns
                .iter()
                .map(|col| {
                    let value = match col.get(i) {
                        Ok(AnyValue::Float64(v)) => json!(v),
                        Ok(AnyValue::Float32(v)) => json!(v),
                        Ok(AnyValue::Int64(v)) => json!(v),
                        Ok(AnyValue::Int32(v)) => json!(v),
                        Ok(AnyValue::UInt32(v)) => json!(v),
                        Ok(AnyValue::String(v)) => json!(v),
                        Ok(AnyValue::Boolean(v)) => json!(v),
                        Ok(AnyValue::Null) => Value::Null,
                        Ok(other) => json!(other.to_string()),
                        Err(_) => Value::Null,
                    };
                    (col.name().to_string(), value)
                })
                .collect()
        })
        .collect()
}
