//! Integration tests for Basket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p basket-integration-tests
//! ```
//!
//! Each test builds the real application router over a private in-memory
//! SQLite database and drives it with `tower::ServiceExt::oneshot`, so no
//! server process or database file is needed.
//!
//! # Test Categories
//!
//! - `cart_api` - HTTP behavior of `/api/cart` and the session cookie
//! - `retention` - Purging stale entries as seen through the API

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use basket_server::{
    config::ServerConfig,
    db::{CartRepository, create_memory_pool},
    routes,
    state::AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// A response reduced to what the tests inspect.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the `cart_session` cookie set by this response, if any.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| v.strip_prefix("cart_session="))
            .and_then(|rest| rest.split(';').next())
            .map(String::from)
    }
}

/// Router plus direct access to its database.
pub struct TestContext {
    pub app: Router,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Build the application over a fresh in-memory database.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created.
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    /// Build the application with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created.
    #[allow(clippy::unwrap_used)]
    pub async fn with_config(config: ServerConfig) -> Self {
        let pool = create_memory_pool().await.unwrap();
        CartRepository::new(&pool).initialize().await.unwrap();
        let app = routes::app(AppState::new(config, pool.clone()));
        Self { app, pool }
    }

    /// Repository over the test database.
    #[must_use]
    pub fn carts(&self) -> CartRepository<'_> {
        CartRepository::new(&self.pool)
    }

    /// Send a request with an optional session cookie and raw JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is not JSON.
    #[allow(clippy::unwrap_used)]
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, format!("cart_session={session}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET /api/cart` for a session.
    pub async fn get_cart(&self, session: Option<&str>) -> TestResponse {
        self.send(Method::GET, "/api/cart", session, None).await
    }

    /// `POST /api/cart` with a raw JSON body for a session.
    pub async fn post_cart(&self, session: Option<&str>, body: &str) -> TestResponse {
        self.send(Method::POST, "/api/cart", session, Some(body))
            .await
    }
}

/// Product names from a `GET /api/cart` body.
#[must_use]
pub fn product_names(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("product_name").and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
