use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use market_data::FallbackChain;
use portfolio_backtest::{BacktestEngine, EngineConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::request_id::REQUEST_ID_HEADER;
use crate::{build_router, AppState};

fn app() -> Router {
    let state = AppState::new(
        BacktestEngine::new(EngineConfig::default()),
        FallbackChain::default().with_sample_fallback(),
    );
    build_router(state, &[])
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn year_2024() -> Value {
    json!({
        "profile": "Moderate",
        "start_date": "2024-01-01",
        "end_date": "2024-12-31",
        "initial_investment": 1000.0,
        "contribution_frequency": "Monthly",
        "contribution_amount": 100.0
    })
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_profiles() {
    let (status, body) = send(get("/api/profiles")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let profiles = body["data"].as_array().unwrap();
    assert_eq!(profiles.len(), 3);
    assert_eq!(profiles[0]["profile"], "Conservative");
    assert_eq!(profiles[2]["profile"], "Aggressive");
}

#[tokio::test]
async fn test_get_profile_by_name() {
    let (status, body) = send(get("/api/profiles/aggressive")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["daily_return_mean"], 0.0006);
    assert_eq!(body["data"]["daily_return_std_dev"], 0.035);
}

#[tokio::test]
async fn test_unknown_profile_is_404() {
    let (status, body) = send(get("/api/profiles/reckless")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("reckless"));
}

#[tokio::test]
async fn test_run_backtest() {
    let (status, body) = send(post_json("/api/backtest/run", year_2024())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    let points = data["points"].as_array().unwrap();
    assert_eq!(points.len(), 366);
    assert_eq!(points[0]["date"], "2024-01-01");
    assert_eq!(points[0]["portfolio_value"], 1000.0);
    assert_eq!(data["total_contributions"], 1100.0);
    assert_eq!(data["request"]["profile"], "Moderate");
    assert!(data["max_drawdown_pct"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_run_is_deterministic_across_requests() {
    let (_, first) = send(post_json("/api/backtest/run", year_2024())).await;
    let (_, second) = send(post_json("/api/backtest/run", year_2024())).await;
    assert_eq!(first["data"]["final_value"], second["data"]["final_value"]);
}

#[tokio::test]
async fn test_short_window_is_400() {
    let mut body = year_2024();
    body["end_date"] = json!("2024-01-11");
    let (status, body) = send(post_json("/api/backtest/run", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("30"));
}

#[tokio::test]
async fn test_zero_investment_is_400() {
    let mut body = year_2024();
    body["initial_investment"] = json!(0.0);
    let (status, _) = send(post_json("/api/backtest/run", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_profile_in_body_is_400() {
    let mut body = year_2024();
    body["profile"] = json!("Reckless");
    let (status, _) = send(post_json("/api/backtest/run", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_compare_profiles() {
    let (status, body) = send(post_json("/api/backtest/compare", year_2024())).await;
    assert_eq!(status, StatusCode::OK);

    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    let profiles: Vec<&str> = results
        .iter()
        .map(|r| r["request"]["profile"].as_str().unwrap())
        .collect();
    assert_eq!(profiles, vec!["Conservative", "Moderate", "Aggressive"]);
}

#[tokio::test]
async fn test_market_snapshot_from_sample() {
    let (status, body) = send(get("/api/market/snapshot")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "sample");
    assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_market_snapshot_unavailable_is_503() {
    let router = build_router(
        AppState::new(BacktestEngine::default(), FallbackChain::default()),
        &[],
    );
    let response = router.oneshot(get("/api/market/snapshot")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let response = app().oneshot(get("/health")).await.unwrap();
    let generated = response.headers().get(REQUEST_ID_HEADER).unwrap();
    assert!(!generated.is_empty());

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "dash-123")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "dash-123");
}

#[tokio::test]
async fn test_market_overview_defaults() {
    let (status, body) = send(get("/api/market/overview")).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["rows"][0]["market_cap_display"], "$1.80T");
    assert_eq!(data["top_market_caps"].as_array().unwrap().len(), 5);
    assert_eq!(data["top_market_caps"][0]["name"], "Bitcoin");
    assert_eq!(data["weekly_performance"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_market_overview_custom_series_length() {
    let (status, body) = send(get("/api/market/overview?top=3&weekly=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["top_market_caps"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["weekly_performance"][1]["symbol"], "ETH");
}

#[tokio::test]
async fn test_allocation_preview() {
    let body = json!({ "asset": "usdt", "weight": 0.1 });
    let (status, body) = send(post_json("/api/profiles/conservative/allocation", body)).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["profile"], "Conservative");
    let weights = data["allocation"]["weights"].as_array().unwrap();
    assert_eq!(weights.len(), 4);
    assert_eq!(weights[2]["asset"], "USDT");
    assert_eq!(weights[2]["weight"], 0.1);
    assert!((data["total_weight"].as_f64().unwrap() - 0.9).abs() < 1e-9);

    // The catalogue itself is unchanged.
    let (_, profile) = send(get("/api/profiles/conservative")).await;
    assert_eq!(profile["data"]["allocation"]["weights"][2]["weight"], 0.2);
}

#[tokio::test]
async fn test_allocation_preview_rejects_out_of_range_weight() {
    let body = json!({ "asset": "BTC", "weight": 1.5 });
    let (status, body) = send(post_json("/api/profiles/moderate/allocation", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("0..=1"));
}

#[tokio::test]
async fn test_allocation_preview_unknown_profile_is_404() {
    let body = json!({ "asset": "BTC", "weight": 0.5 });
    let (status, _) = send(post_json("/api/profiles/reckless/allocation", body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/backtest/run")
        .header("content-type", "application/json")
        .body(Body::from("{\"profile\": \"Moderate\""))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_field_uses_error_envelope() {
    let mut body = year_2024();
    body.as_object_mut().unwrap().remove("start_date");
    let (status, body) = send(post_json("/api/backtest/compare", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("start_date"));
}

#[tokio::test]
async fn test_oversized_window_is_400() {
    let mut body = year_2024();
    body["start_date"] = json!("0001-01-01");
    body["end_date"] = json!("9999-12-31");
    let (status, body) = send(post_json("/api/backtest/compare", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("maximum"));
}
