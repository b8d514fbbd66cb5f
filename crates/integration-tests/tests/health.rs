//! Liveness and readiness probes.

use axum::http::StatusCode;
use minicart_integration_tests::TestApp;

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::Value::String("OK".to_owned()));

    let (status, _) = app.get("/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}
