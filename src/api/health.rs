use crate::api::AppState;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Ready once the ledger store answers a read.
pub async fn ready(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let entries = state.desk.get_entries().await?;
    Ok(Json(json!({"status": "ready", "entries": entries.len()})))
}
