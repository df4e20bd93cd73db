//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::checkout;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cart_core::{CheckoutError, CheckoutRequest, CheckoutResponse};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::{error, instrument, warn};

// =============================================================================
// Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            message: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Generic 500 body; internal detail stays in the logs
    pub fn server_error() -> Self {
        Self::new("SERVER_ERROR").with_message("Internal server error")
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.error_code();

    let (status, body) = match err {
        CheckoutError::EmptyItems => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(code).with_details("Order has no items"),
        ),
        CheckoutError::NoItems(details) | CheckoutError::InvalidItems(details) => {
            (StatusCode::BAD_REQUEST, ErrorResponse::new(code).with_details(details))
        }
        CheckoutError::Provider {
            status, details, ..
        } => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            ErrorResponse::new(code).with_details(details),
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::server_error()),
    };

    (status, Json(body))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "cart-checkout",
        "version": env!("CARGO_PKG_VERSION"),
        "payment_provider": state.payments.provider_name(),
        "email_transport": state.email_transport(),
    }))
}

/// Create a checkout preference (`POST /api/create_preference`)
#[instrument(skip(state, payload))]
pub async fn create_preference(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Unreadable checkout body: {}", rejection.body_text());
        checkout_error_to_response(CheckoutError::NoItems(rejection.body_text()))
    })?;

    checkout::process_checkout(&state, request)
        .await
        .map(Json)
        .map_err(|e| {
            if e.is_client_error() {
                warn!("Rejected checkout: {}", e);
            } else {
                error!("Checkout failed: {}", e);
            }
            checkout_error_to_response(e)
        })
}

/// Turn a handler panic into the generic server error body
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::server_error()),
    )
        .into_response()
}
