use crate::engine::{next_contract_months, weighted_average, PriceEntry, WeightedAverage};
use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AverageRequest {
    pub entries: Vec<PriceEntry>,
}

pub async fn calculate_average(
    payload: Result<Json<AverageRequest>, JsonRejection>,
) -> Result<Json<WeightedAverage>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(weighted_average(&req.entries)?))
}

#[derive(Debug, Deserialize)]
pub struct NextContractsQuery {
    pub current: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NextContractsResponse {
    pub months: Vec<&'static str>,
}

pub async fn get_next_contracts(
    params: Result<Query<NextContractsQuery>, QueryRejection>,
) -> Result<Json<NextContractsResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(NextContractsResponse {
        months: next_contract_months(params.current.as_deref()),
    }))
}
