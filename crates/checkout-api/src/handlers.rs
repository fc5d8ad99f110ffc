//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use checkout_core::{CartId, CheckoutError, CheckoutOutcome, CustomerId, PriceBreakdown};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Finalize checkout request
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub cart_id: CartId,
    pub customer_id: CustomerId,
}

/// Query string for quotes
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub customer_id: CustomerId,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            retryable: false,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    if code >= 500 {
        error!("Checkout failed: {}", err);
    } else {
        warn!("Checkout rejected: {}", err);
    }

    let mut response = ErrorResponse::new(err.to_string(), code);
    response.retryable = err.is_retryable();
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Finalize a customer's cart
#[instrument(skip(state), fields(cart_id = request.cart_id, customer_id = request.customer_id))]
pub async fn finalize_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutOutcome>, ApiError> {
    let outcome = state
        .checkout
        .finalize_checkout(request.cart_id, request.customer_id)
        .await
        .map_err(checkout_error_to_response)?;

    info!(
        "Checkout completed: cart={}, transaction={:?}",
        request.cart_id, outcome.transaction_id
    );
    Ok(Json(outcome))
}

/// Price a cart without placing the order
#[instrument(skip(state))]
pub async fn quote_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<CartId>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<PriceBreakdown>, ApiError> {
    state
        .checkout
        .quote(cart_id, query.customer_id)
        .await
        .map(Json)
        .map_err(checkout_error_to_response)
}
