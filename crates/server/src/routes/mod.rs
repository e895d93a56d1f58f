//! HTTP route handlers for the cart service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Cart (JSON)
//! GET  /api/cart               - Product names in the visitor's cart
//! POST /api/cart               - Add a product ({"product": "..."})
//!
//! # Static assets
//! GET  /*                      - Files from the public directory
//! ```

pub mod cart;
pub mod health;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::Span;

use crate::middleware::{SessionSettings, request_id_middleware, session_middleware};
use crate::state::AppState;

/// Create the JSON API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/cart", get(cart::show).post(cart::add))
}

/// Open the span every request is traced under.
fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

/// Build the complete application: routes, static files and middleware.
pub fn app(state: AppState) -> Router {
    let session = SessionSettings::from(state.config());
    let public_dir = ServeDir::new(&state.config().public_dir);

    Router::new()
        .merge(routes())
        .fallback_service(public_dir)
        .layer(from_fn_with_state(session, session_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
