use crate::api::AppState;
use crate::engine::Dashboard;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    let dashboard = state.desk.get_dashboard().await?;
    Ok(Json(dashboard))
}
