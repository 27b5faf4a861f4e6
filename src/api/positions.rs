use crate::api::AppState;
use crate::domain::InventoryCode;
use crate::engine::{InventoryPrice, Position};
use crate::error::AppError;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
pub struct PositionsQuery {
    pub commodity: Option<String>,
    pub contract: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PositionsResponse {
    pub positions: Vec<Position>,
}

pub async fn get_positions(
    State(state): State<AppState>,
    params: Result<Query<PositionsQuery>, QueryRejection>,
) -> Result<Json<PositionsResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let positions = state
        .desk
        .get_open_positions(params.commodity.as_deref(), params.contract.as_deref())
        .await?;

    Ok(Json(PositionsResponse { positions }))
}

#[derive(Debug, Deserialize)]
pub struct InventoryPricesQuery {
    /// Comma-separated inventory codes.
    pub codes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryPricesResponse {
    pub prices: Vec<InventoryPrice>,
}

fn parse_codes(raw: Option<&str>) -> HashSet<InventoryCode> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(InventoryCode::new)
        .collect()
}

pub async fn get_inventory_prices(
    State(state): State<AppState>,
    params: Result<Query<InventoryPricesQuery>, QueryRejection>,
) -> Result<Json<InventoryPricesResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let codes = parse_codes(params.codes.as_deref());
    let prices = state.desk.get_inventory_prices(&codes).await?;

    Ok(Json(InventoryPricesResponse { prices }))
}
