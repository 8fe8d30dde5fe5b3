mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use serde_json::json;
use ttl_shortener::api::handlers::shorten_handler;
use ttl_shortener::domain::repositories::LinkStore;

fn server(state: ttl_shortener::AppState) -> TestServer {
    let app = Router::new()
        .route("/shorten", post(shorten_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_shorten_success() {
    let ctx = common::create_test_state();
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/a" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    let code = json["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(json["original_url"], "https://example.com/a");
    assert_eq!(json["short_url"], format!("https://sho.rt/{}", code));
    assert_eq!(json["expiration_date"], "2026-01-08T00:00:00Z");
    assert_eq!(json["access_count"], 0);

    assert!(ctx.store.get(code).await.unwrap().is_some());
}

#[tokio::test]
async fn test_shorten_with_expiration_days() {
    let ctx = common::create_test_state();
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/a", "expiration_days": 1 }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["expiration_date"], "2026-01-02T00:00:00Z");
}

#[tokio::test]
async fn test_shorten_same_url_returns_same_code() {
    let ctx = common::create_test_state();
    let server = server(ctx.state);

    let first = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/a", "expiration_days": 1 }))
        .await
        .json::<serde_json::Value>();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://EXAMPLE.com:443/a", "expiration_days": 5 }))
        .await;

    response.assert_status_ok();
    let second = response.json::<serde_json::Value>();
    assert_eq!(first["short_code"], second["short_code"]);
    assert_eq!(second["expiration_date"], "2026-01-06T00:00:00Z");
    assert_eq!(ctx.store.len(), 1);
}

#[tokio::test]
async fn test_shorten_rejects_out_of_range_ttl() {
    let ctx = common::create_test_state();
    let server = server(ctx.state);

    for days in [0, 366, -3] {
        let response = server
            .post("/shorten")
            .json(&json!({ "url": "https://example.com", "expiration_days": days }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
    }

    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_invalid_url() {
    let ctx = common::create_test_state();
    let server = server(ctx.state);

    for url in ["not-a-url", "ftp://example.com/file"] {
        let response = server.post("/shorten").json(&json!({ "url": url })).await;

        response.assert_status_bad_request();
    }

    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_malformed_body() {
    let ctx = common::create_test_state();
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "link": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_uses_forwarded_host_without_base_url() {
    let ctx = common::create_test_state_with_base_url(None);
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .add_header("Host", "links.example")
        .add_header("X-Forwarded-Proto", "https")
        .json(&json!({ "url": "https://example.com/a" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    let short_url = json["short_url"].as_str().unwrap();
    assert!(short_url.starts_with("https://links.example/"));
}
