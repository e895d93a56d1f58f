//! Integration tests for the cart API and session cookie.

use std::collections::HashSet;

use axum::http::{Method, StatusCode, header};
use basket_integration_tests::{TestContext, product_names};
use basket_server::config::ServerConfig;
use serde_json::json;

// =============================================================================
// Session Cookie
// =============================================================================

#[tokio::test]
async fn test_first_visit_sets_session_cookie() {
    let ctx = TestContext::new().await;
    let response = ctx.get_cart(None).await;

    assert_eq!(response.status, StatusCode::OK);
    let session = response.session_cookie().expect("cookie should be set");
    assert_eq!(session.len(), 32);
    assert!(session.bytes().all(|b| b.is_ascii_hexdigit()));

    let raw = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(raw.contains("HttpOnly"));
    assert!(raw.contains("Max-Age=31536000"));
}

#[tokio::test]
async fn test_each_new_visitor_gets_distinct_session() {
    let ctx = TestContext::new().await;
    let mut seen = HashSet::new();

    for _ in 0..50 {
        let session = ctx.get_cart(None).await.session_cookie();
        assert!(seen.insert(session.expect("cookie should be set")));
    }
}

#[tokio::test]
async fn test_existing_cookie_is_not_replaced() {
    let ctx = TestContext::new().await;
    let response = ctx.get_cart(Some("0123456789abcdef0123456789abcdef")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_secure_cookie_when_configured() {
    let config = ServerConfig {
        secure_cookies: true,
        ..ServerConfig::default()
    };
    let ctx = TestContext::with_config(config).await;
    let response = ctx.get_cart(None).await;

    let raw = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(raw.contains("Secure"));
}

// =============================================================================
// Reading and Adding
// =============================================================================

#[tokio::test]
async fn test_new_cart_is_empty_array() {
    let ctx = TestContext::new().await;
    let response = ctx.get_cart(Some("fresh-visitor")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_add_then_read_widget() {
    let ctx = TestContext::new().await;

    let added = ctx.post_cart(None, r#"{"product":"Widget"}"#).await;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.body, json!({ "status": "success" }));
    let session = added.session_cookie().expect("cookie should be set");

    let cart = ctx.get_cart(Some(&session)).await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body, json!([{ "product_name": "Widget" }]));
    assert!(cart.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_sequential_adds_accumulate_in_order() {
    let ctx = TestContext::new().await;
    let session = "visitor-1";
    let products = ["Widget", "Gadget", "Widget", "Sprocket"];

    for product in products {
        let body = json!({ "product": product }).to_string();
        let response = ctx.post_cart(Some(session), &body).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let cart = ctx.get_cart(Some(session)).await;
    assert_eq!(product_names(&cart.body), products);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let ctx = TestContext::new().await;

    ctx.post_cart(Some("alice"), r#"{"product":"Widget"}"#)
        .await;
    ctx.post_cart(Some("bob"), r#"{"product":"Gadget"}"#).await;

    assert_eq!(
        product_names(&ctx.get_cart(Some("alice")).await.body),
        ["Widget"]
    );
    assert_eq!(
        product_names(&ctx.get_cart(Some("bob")).await.body),
        ["Gadget"]
    );
}

#[tokio::test]
async fn test_read_is_capped() {
    let config = ServerConfig {
        max_cart_items: 2,
        ..ServerConfig::default()
    };
    let ctx = TestContext::with_config(config).await;

    for product in ["A", "B", "C"] {
        let body = json!({ "product": product }).to_string();
        ctx.post_cart(Some("visitor"), &body).await;
    }

    let cart = ctx.get_cart(Some("visitor")).await;
    assert_eq!(product_names(&cart.body), ["A", "B"]);
}

// =============================================================================
// Input Validation
// =============================================================================

#[tokio::test]
async fn test_invalid_bodies_are_rejected_without_insert() {
    let ctx = TestContext::new().await;
    let session = "validator";

    let bad_bodies = [
        "{}",
        r#"{"product":null}"#,
        r#"{"product":42}"#,
        r#"{"product":""}"#,
        r#"{"product":"   "}"#,
        r#"{"name":"Widget"}"#,
        "not json",
        "[]",
    ];

    for body in bad_bodies {
        let response = ctx.post_cart(Some(session), body).await;
        assert_eq!(
            response.status,
            StatusCode::BAD_REQUEST,
            "body {body} should be rejected"
        );
        assert!(response.body.get("error").is_some());
    }

    assert_eq!(ctx.get_cart(Some(session)).await.body, json!([]));
    assert_eq!(ctx.carts().count_entries().await.unwrap_or(-1), 0);
}

#[tokio::test]
async fn test_missing_body_is_rejected() {
    let ctx = TestContext::new().await;
    let response = ctx
        .send(Method::POST, "/api/cart", Some("visitor"), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.carts().count_entries().await.unwrap_or(-1), 0);
}

// =============================================================================
// Storage Failures
// =============================================================================

#[tokio::test]
async fn test_storage_failure_is_generic_500() {
    let ctx = TestContext::new().await;
    ctx.pool.close().await;

    let read = ctx.get_cart(Some("visitor")).await;
    assert_eq!(read.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read.body, json!({ "error": "Internal server error" }));

    let write = ctx.post_cart(Some("visitor"), r#"{"product":"Widget"}"#).await;
    assert_eq!(write.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(write.body, json!({ "error": "Internal server error" }));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let live = ctx.send(Method::GET, "/health", None, None).await;
    assert_eq!(live.status, StatusCode::OK);

    let ready = ctx.send(Method::GET, "/health/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);

    ctx.pool.close().await;
    let not_ready = ctx.send(Method::GET, "/health/ready", None, None).await;
    assert_eq!(not_ready.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let ctx = TestContext::new().await;
    let response = ctx.get_cart(Some("visitor")).await;
    assert!(response.headers.get("x-request-id").is_some());
}
