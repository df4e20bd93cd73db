//! # Checkout Error Types
//!
//! Typed error handling for the checkout service.
//! Checkout operations return `Result<T, CheckoutError>`; receipt delivery
//! has its own `EmailError` because it never fails a checkout.

use thiserror::Error;

/// Core error type for checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The order carried no items
    #[error("Order has no items")]
    EmptyItems,

    /// The body could not be read as a cart (malformed JSON, `items` not a list)
    #[error("No readable items in request: {0}")]
    NoItems(String),

    /// An item failed numeric coercion or range checks
    #[error("Invalid items: {0}")]
    InvalidItems(String),

    /// Payment provider answered with a non-success status
    #[error("Provider error [{provider}] status {status}: {details}")]
    Provider {
        provider: String,
        status: u16,
        details: String,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Provider failures keep the upstream status so callers see what
    /// Mercado Pago said.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::EmptyItems => 400,
            CheckoutError::NoItems(_) => 400,
            CheckoutError::InvalidItems(_) => 400,
            CheckoutError::Provider { status, .. } => *status,
            CheckoutError::Network(_) => 500,
            CheckoutError::Serialization(_) => 500,
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Internal(_) => 500,
        }
    }

    /// Wire error code used in the `error` field of JSON responses
    pub fn error_code(&self) -> &'static str {
        match self {
            CheckoutError::EmptyItems => "EMPTY_ITEMS",
            CheckoutError::NoItems(_) => "NO_ITEMS",
            CheckoutError::InvalidItems(_) => "INVALID_ITEMS",
            CheckoutError::Provider { .. } => "MP_ERROR",
            _ => "SERVER_ERROR",
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::EmptyItems | CheckoutError::NoItems(_) | CheckoutError::InvalidItems(_)
        )
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Receipt delivery errors. Logged, never surfaced to the buyer.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Mail configuration error: {0}")]
    Configuration(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Delivery failed [{transport}]: {message}")]
    Delivery { transport: String, message: String },

    #[error("Delivery timed out after {0}s")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::EmptyItems.status_code(), 400);
        assert_eq!(CheckoutError::InvalidItems("x".into()).status_code(), 400);
        assert_eq!(
            CheckoutError::Provider {
                provider: "mercadopago".into(),
                status: 401,
                details: "unauthorized".into()
            }
            .status_code(),
            401
        );
        assert_eq!(CheckoutError::Network("timeout".into()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CheckoutError::EmptyItems.error_code(), "EMPTY_ITEMS");
        assert_eq!(CheckoutError::NoItems("bad json".into()).error_code(), "NO_ITEMS");
        assert_eq!(
            CheckoutError::Provider {
                provider: "mercadopago".into(),
                status: 400,
                details: String::new()
            }
            .error_code(),
            "MP_ERROR"
        );
        assert_eq!(CheckoutError::Serialization("eof".into()).error_code(), "SERVER_ERROR");
        assert_eq!(CheckoutError::Internal("boom".into()).error_code(), "SERVER_ERROR");
    }

    #[test]
    fn test_client_errors() {
        assert!(CheckoutError::EmptyItems.is_client_error());
        assert!(!CheckoutError::Network("reset".into()).is_client_error());
    }
}
