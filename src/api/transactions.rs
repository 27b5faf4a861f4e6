use crate::api::AppState;
use crate::domain::{Transaction, TransactionRow};
use crate::error::AppError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub rows: Vec<TransactionRow>,
}

pub async fn submit_transaction(
    State(state): State<AppState>,
    payload: Result<Json<Transaction>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let Json(tx) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let rows = state.desk.submit_transaction(&tx).await?;

    Ok((StatusCode::CREATED, Json(SubmitResponse { rows })))
}
