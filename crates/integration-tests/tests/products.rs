//! Catalog reads and admin-gated writes.

use axum::http::StatusCode;
use minicart_integration_tests::TestApp;
use serde_json::json;

fn mug() -> serde_json::Value {
    json!({
        "name": "Mug",
        "price": 19.99,
        "category": "kitchen",
        "image": "https://cdn.example.com/mug.png",
        "description": "A mug",
        "stock": 5
    })
}

#[tokio::test]
async fn list_is_public_and_empty_initially() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/products", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"], json!([]));
}

#[tokio::test]
async fn create_requires_admin() {
    let app = TestApp::spawn().await;

    let (status, _) = app.post("/api/products", None, mug()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.register_and_login("A", "a@x.com", "p1").await;
    let (status, body) = app.post("/api/products", Some(&token), mug()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden: insufficient privileges.");
    assert_eq!(app.count_rows("products").await, 0);
}

#[tokio::test]
async fn admin_creates_and_reads_product() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root@x.com").await;

    let (status, body) = app.post("/api/products", Some(&admin), mug()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product created successfully");

    let (status, body) = app.get("/api/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["name"], "Mug");
    assert_eq!(body["product"]["price"], 19.99);
    assert_eq!(body["product"]["stock"], 5);

    let (status, body) = app.get("/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root@x.com").await;

    let (status, body) = app
        .post(
            "/api/products",
            Some(&admin),
            json!({ "name": "Mug", "category": "kitchen" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name, price, category and image are required");
}

#[tokio::test]
async fn create_defaults_description_and_stock() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root@x.com").await;

    let (status, _) = app
        .post(
            "/api/products",
            Some(&admin),
            json!({ "name": "Bare", "price": 5, "category": "misc", "image": "i.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/api/products/1", None).await;
    assert_eq!(body["product"]["description"], "");
    assert_eq!(body["product"]["stock"], 0);
}

#[tokio::test]
async fn extreme_price_is_accepted_without_wrapping() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root@x.com").await;

    let (status, _) = app
        .post(
            "/api/products",
            Some(&admin),
            json!({
                "name": "Vault",
                "price": 9_223_372_036_854_775_807_i64,
                "category": "misc",
                "image": "vault.png"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // The amount clamps to the representable maximum instead of wrapping
    // negative.
    let cents: i64 = sqlx::query_scalar("SELECT price FROM products WHERE id = 1")
        .fetch_one(&app.pool)
        .await
        .expect("price query failed");
    assert_eq!(cents, i64::MAX);
}

#[tokio::test]
async fn get_missing_product_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/products/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn update_replaces_fields() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root@x.com").await;
    app.post("/api/products", Some(&admin), mug()).await;

    let (status, body) = app
        .put(
            "/api/products/1",
            Some(&admin),
            json!({
                "name": "Big Mug",
                "price": 24,
                "category": "kitchen",
                "image": "big-mug.png",
                "stock": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");

    let (_, body) = app.get("/api/products/1", None).await;
    assert_eq!(body["product"]["name"], "Big Mug");
    assert_eq!(body["product"]["price"], 24);
    assert_eq!(body["product"]["description"], "");
}

#[tokio::test]
async fn update_and_delete_report_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root@x.com").await;

    let (status, _) = app.put("/api/products/9", Some(&admin), mug()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.delete("/api/products/9", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn delete_removes_product() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root@x.com").await;
    app.post("/api/products", Some(&admin), mug()).await;

    let (status, body) = app.delete("/api/products/1", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");
    assert_eq!(app.count_rows("products").await, 0);
}
