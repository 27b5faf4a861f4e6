use axum::body::Body;
use axum::http::{Request, StatusCode};
use hedgebook::api::{self, AppState};
use hedgebook::{init_db, HedgeDesk, Repository};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

async fn setup_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));
    let desk = Arc::new(HedgeDesk::new(repo, Duration::from_secs(5)));

    (api::create_router(AppState::new(desk)), temp_dir)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &axum::Router, uri: &str, payload: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn sell_payload(lots: u32) -> Value {
    json!({
        "date": "2024-01-01",
        "commodity": "Cotton",
        "productType": "Raw",
        "lots": lots,
        "reason": "Sell",
        "trader": "Priya",
        "contract": "Mar",
        "supplierName": "Acme Mills",
        "avgPrice": 61000
    })
}

async fn record_sell(app: &axum::Router, lots: u32) -> String {
    let (status, body) = post_json(app, "/v1/transactions", &sell_payload(lots)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["rows"][0]["inventoryCode"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_and_ready() {
    let (app, _temp) = setup_test_app().await;

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get_json(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_sell_creates_open_position() {
    let (app, _temp) = setup_test_app().await;
    let code = record_sell(&app, 10).await;
    assert_eq!(code, "ACM-CO-RA-Mar-010124-001");

    let (status, body) = get_json(&app, "/v1/positions?commodity=Cotton&contract=Mar").await;
    assert_eq!(status, StatusCode::OK);
    let positions = body["positions"].as_array().unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["code"], code);
    assert_eq!(positions[0]["openLots"].as_f64(), Some(10.0));
    assert_eq!(positions[0]["counterparty"], "Acme Mills");

    let (_, body) = get_json(&app, "/v1/positions?commodity=Wheat").await;
    assert!(body["positions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_buy_closes_position() {
    let (app, _temp) = setup_test_app().await;
    let code = record_sell(&app, 10).await;

    let buy = json!({
        "date": "2024-01-02",
        "commodity": "Cotton",
        "productType": "Raw",
        "lots": 10,
        "reason": "Buy",
        "trader": "Priya",
        "contract": "Mar",
        "buyerName": "Delta Exports",
        "avgPrice": 62000,
        "selectedAllocations": [{"code": code, "quantity": 10}]
    });
    let (status, body) = post_json(&app, "/v1/transactions", &buy).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(body["rows"][0]["reason"], "Buy");

    let (_, body) = get_json(&app, "/v1/positions").await;
    assert!(body["positions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_failure_is_unprocessable() {
    let (app, _temp) = setup_test_app().await;
    let code = record_sell(&app, 10).await;

    let buy = json!({
        "date": "2024-01-02",
        "commodity": "Cotton",
        "productType": "Raw",
        "lots": 10,
        "reason": "Buy",
        "trader": "Priya",
        "contract": "Mar",
        "avgPrice": 62000,
        "selectedAllocations": [{"code": code, "quantity": 7}]
    });
    let (status, body) = post_json(&app, "/v1/transactions", &buy).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "AllocationMismatch");
    assert!(body["error"].is_string());

    let (_, body) = get_json(&app, "/v1/entries").await;
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, _temp) = setup_test_app().await;
    let (status, body) = post_json(&app, "/v1/transactions", &json!({"reason": "Sell"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BadRequest");
}

#[tokio::test]
async fn test_inventory_prices() {
    let (app, _temp) = setup_test_app().await;
    let code = record_sell(&app, 5).await;

    let uri = format!("/v1/inventory/prices?codes={},MISSING-CODE", code);
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let prices = body["prices"].as_array().unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0]["code"], code);
    assert_eq!(prices[0]["avgPrice"].as_f64(), Some(61000.0));

    let (status, body) = get_json(&app, "/v1/inventory/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["prices"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_entries_export_is_csv() {
    let (app, _temp) = setup_test_app().await;
    record_sell(&app, 3).await;

    let request = Request::builder()
        .method("GET")
        .uri("/v1/entries/export")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Date,Commodity,Product Type"));
    assert!(lines[1].contains("ACM-CO-RA-Mar-010124-001"));
}

#[tokio::test]
async fn test_dashboard_summarizes_contracts() {
    let (app, _temp) = setup_test_app().await;
    record_sell(&app, 4).await;

    let (status, body) = get_json(&app, "/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let summary = body["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0]["contract"], "Mar");
    assert_eq!(body["inventory"].as_array().unwrap().len(), 1);
    assert!(body["buys"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_calculator_endpoints() {
    let (app, _temp) = setup_test_app().await;

    let payload = json!({"entries": [
        {"lots": 2, "price": 100},
        {"lots": 1, "price": 110}
    ]});
    let (status, body) = post_json(&app, "/v1/calculator/average", &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalLots"].as_f64(), Some(3.0));
    assert_eq!(body["avgPrice"].as_f64(), Some(103.33));

    let (status, body) = get_json(&app, "/v1/contracts/next?current=Nov").await;
    assert_eq!(status, StatusCode::OK);
    let months = body["months"].as_array().unwrap();
    assert_eq!(months.len(), 11);
    assert_eq!(months[0], "Dec");
    assert_eq!(months[1], "Jan");
}

#[tokio::test]
async fn test_malformed_query_is_json_bad_request() {
    let (app, _temp) = setup_test_app().await;

    for uri in [
        "/v1/positions?commodity=Cotton&commodity=Wheat",
        "/v1/inventory/prices?codes=A&codes=B",
        "/v1/contracts/next?current=Mar&current=May",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["kind"], "BadRequest");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_calculator_overflow_is_unprocessable() {
    let (app, _temp) = setup_test_app().await;

    let payload = json!({"entries": [
        {"lots": 1000000000000000u64, "price": 1000000000000000u64}
    ]});
    let (status, body) = post_json(&app, "/v1/calculator/average", &payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "OutOfRange");
}
