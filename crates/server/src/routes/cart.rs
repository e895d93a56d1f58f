//! Cart route handlers.
//!
//! Both handlers run after the session middleware, so the visitor's
//! [`CartSession`] is always available. Input is validated before the store
//! is contacted.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use basket_core::ProductName;

use crate::error::{AppError, Result};
use crate::middleware::CartSession;
use crate::models::CartItemView;
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product: Option<String>,
}

/// Acknowledgement returned by mutating endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Validate the add-to-cart body into a product name.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the body could not be read, the
/// `product` field is missing, null, or not a usable name.
pub fn parse_add_request(
    payload: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<ProductName> {
    let Json(request) = payload?;
    let product = request
        .product
        .ok_or_else(|| AppError::BadRequest("missing field `product`".to_string()))?;
    ProductName::parse(&product).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// List the products in the visitor's cart.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    CartSession(session_id): CartSession,
) -> Result<Json<Vec<CartItemView>>> {
    let items = state
        .carts()
        .list_items(&session_id, state.config().max_cart_items)
        .await?;

    tracing::debug!(count = items.len(), "Loaded cart");
    Ok(Json(items.into_iter().map(CartItemView::from).collect()))
}

/// Add a product to the visitor's cart.
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    CartSession(session_id): CartSession,
    payload: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>> {
    let product = parse_add_request(payload)?;

    let entry = state.carts().add_item(&session_id, &product).await?;
    tracing::info!(entry_id = %entry.id, "Added item to cart");

    Ok(Json(StatusResponse::success()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(product: Option<&str>) -> std::result::Result<Json<AddToCartRequest>, JsonRejection> {
        Ok(Json(AddToCartRequest {
            product: product.map(String::from),
        }))
    }

    #[test]
    fn test_parse_add_request_valid() {
        let name = parse_add_request(request(Some("Widget"))).unwrap();
        assert_eq!(name.as_str(), "Widget");
    }

    #[test]
    fn test_parse_add_request_missing() {
        let err = parse_add_request(request(None)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("product")));
    }

    #[test]
    fn test_parse_add_request_blank() {
        assert!(matches!(
            parse_add_request(request(Some("  "))),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_status_response_json() {
        let json = serde_json::to_value(StatusResponse::success()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success" }));
    }
}
