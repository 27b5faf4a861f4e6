use crate::api::AppState;
use crate::domain::TransactionRow;
use crate::error::AppError;
use crate::store::csv::encode_rows;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<TransactionRow>,
}

pub async fn get_entries(State(state): State<AppState>) -> Result<Json<EntriesResponse>, AppError> {
    let entries = state.desk.get_entries().await?;
    Ok(Json(EntriesResponse { entries }))
}

/// The whole ledger as a CSV download with the sheet header.
pub async fn export_entries(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entries = state.desk.get_entries().await?;
    let body = encode_rows(&entries, true)
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ledger.csv\"",
            ),
        ],
        body,
    ))
}
