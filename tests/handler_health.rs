mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use std::sync::Arc;
use tenant_router::api::handlers::health_handler;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _rx) = common::create_test_state(Arc::new(common::tenants()), common::links());
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["event_queue"]["status"], "ok");
    assert_eq!(json["checks"]["tenant_cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_store_fails() {
    let tenants = Arc::new(common::tenants());
    tenants.set_failing(true);
    let (state, _rx) = common::create_test_state(tenants, common::links());
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_when_queue_closed() {
    let (state, rx) = common::create_test_state(Arc::new(common::tenants()), common::links());
    drop(rx);
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["event_queue"]["status"], "error");
}
