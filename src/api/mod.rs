pub mod calculator;
pub mod dashboard;
pub mod entries;
pub mod health;
pub mod positions;
pub mod transactions;

use crate::orchestration::HedgeDesk;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<HedgeDesk>,
}

impl AppState {
    pub fn new(desk: Arc<HedgeDesk>) -> Self {
        Self { desk }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/positions", get(positions::get_positions))
        .route(
            "/v1/inventory/prices",
            get(positions::get_inventory_prices),
        )
        .route("/v1/transactions", post(transactions::submit_transaction))
        .route("/v1/entries", get(entries::get_entries))
        .route("/v1/entries/export", get(entries::export_entries))
        .route("/v1/dashboard", get(dashboard::get_dashboard))
        .route(
            "/v1/calculator/average",
            post(calculator::calculate_average),
        )
        .route("/v1/contracts/next", get(calculator::get_next_contracts))
        .layer(cors)
        .with_state(state)
}
