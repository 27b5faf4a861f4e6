use crate::engine::EngineError;
use crate::orchestration::DeskError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Desk(#[from] DeskError),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Desk(DeskError::Engine(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, error_message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BadRequest", msg),
            AppError::Desk(err) => {
                let status = match err {
                    DeskError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    DeskError::AppendOutcomeUnknown(_) => StatusCode::GATEWAY_TIMEOUT,
                    DeskError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, err.kind(), err.to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
