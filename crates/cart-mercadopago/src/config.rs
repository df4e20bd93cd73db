//! # Mercado Pago Configuration
//!
//! Configuration management for the Mercado Pago integration.
//! Secrets are loaded from environment variables once at startup and then
//! passed around explicitly.

use cart_core::CheckoutError;
use std::env;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.mercadopago.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mercado Pago API configuration
#[derive(Debug, Clone)]
pub struct MercadoPagoConfig {
    /// Access token (TEST-... or APP_USR-...)
    pub access_token: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Request timeout for API calls
    pub timeout: Duration,
}

impl MercadoPagoConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `MP_ACCESS_TOKEN`
    ///
    /// Optional:
    /// - `MP_API_BASE_URL` (default `https://api.mercadopago.com`)
    /// - `MP_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let access_token = env::var("MP_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CheckoutError::Configuration("MP_ACCESS_TOKEN not set".to_string()))?;

        let api_base_url =
            env::var("MP_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let timeout_secs = match env::var("MP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                CheckoutError::Configuration(format!("MP_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(access_token.trim())
            .with_api_base_url(api_base_url)
            .with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Create config with explicit values (for testing)
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check if using test credentials
    pub fn is_test_mode(&self) -> bool {
        self.access_token.starts_with("TEST-")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Endpoint for preference creation
    pub fn preferences_url(&self) -> String {
        format!("{}/checkout/preferences", self.api_base_url)
    }
}
