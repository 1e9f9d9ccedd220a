// =====================================================================================
// DASHBOARD CELL INTEGRATION TESTS - SUMMARY CARDS
// =====================================================================================

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use api_client_cell::{OptimizedApiClient, StockwiseApi};
use dashboard_cell::create_dashboard_router;
use performance_cell::{CacheManager, PerformanceMonitor};
use shared_utils::test_utils::{MockStockwiseResponses, TestConfig};

fn create_api(server: &MockServer) -> StockwiseApi {
    let config = TestConfig::with_base_url(format!("{}/api/v1", server.uri())).to_app_config();
    let client = OptimizedApiClient::new(
        &config,
        Arc::new(CacheManager::new()),
        Arc::new(PerformanceMonitor::new()),
    )
    .unwrap();
    StockwiseApi::new(Arc::new(client))
}

async fn mount_json(server: &MockServer, endpoint: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1{}", endpoint)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn get_summary(router: Router) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri("/summary")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_summary_combines_all_sources() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/holdings/portfolio", 200, MockStockwiseResponses::portfolio_summary()).await;
    mount_json(&mock_server, "/risk/", 200, MockStockwiseResponses::risk_analysis()).await;
    mount_json(&mock_server, "/insights/latest", 200, MockStockwiseResponses::latest_insight()).await;

    let (status, json) = get_summary(create_dashboard_router(create_api(&mock_server))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_value"], 3085.0);
    assert_eq!(json["holdings_count"], 3);
    assert_eq!(json["best_performer"]["ticker"], "AAPL");
    assert_eq!(json["worst_performer"]["ticker"], "TSLA");
    assert_eq!(json["risk"]["level"], "medium");
    assert_eq!(json["risk"]["score"], 54.2);
    assert_eq!(json["top_recommendation"], "Reduce technology exposure below 40%");
}

#[tokio::test]
async fn test_summary_degrades_without_risk_and_insight() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/holdings/portfolio", 200, MockStockwiseResponses::portfolio_summary()).await;
    mount_json(&mock_server, "/risk/", 500, MockStockwiseResponses::error_response("risk engine down")).await;
    mount_json(&mock_server, "/insights/latest", 404, MockStockwiseResponses::error_response("No insights yet")).await;

    let (status, json) = get_summary(create_dashboard_router(create_api(&mock_server))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["holdings_count"], 3);
    assert!(json["risk"].is_null());
    assert!(json["top_recommendation"].is_null());
}

#[tokio::test]
async fn test_summary_fails_without_portfolio() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "/holdings/portfolio", 401, MockStockwiseResponses::error_response("Could not validate credentials")).await;
    mount_json(&mock_server, "/risk/", 200, MockStockwiseResponses::risk_analysis()).await;
    mount_json(&mock_server, "/insights/latest", 200, MockStockwiseResponses::latest_insight()).await;

    let (status, json) = get_summary(create_dashboard_router(create_api(&mock_server))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        json["error"],
        "Portfolio unavailable: HTTP 401: Could not validate credentials"
    );
}

#[tokio::test]
async fn test_repeated_summary_is_served_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/holdings/portfolio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockStockwiseResponses::portfolio_summary()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/risk/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockStockwiseResponses::risk_analysis()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/insights/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockStockwiseResponses::latest_insight()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_api(&mock_server);
    let router = create_dashboard_router(api.clone());

    for _ in 0..3 {
        let (status, _) = get_summary(router.clone()).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(api.client().cache().stats().await.hits, 6);
}
