//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment strategy, the optional receipt mailer, and the
//! configuration every request is handled with.

use anyhow::Context;
use cart_core::{BoxedPaymentStrategy, Currency, PreferenceSettings, DEFAULT_TAX_RATE};
use cart_mail::{MailConfig, ReceiptMailer};
use cart_mercadopago::MercadoPagoStrategy;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the storefront (back URLs hang off it)
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Directory with the storefront's static files
    pub static_dir: PathBuf,
    /// Currency for every preference item
    pub currency: Currency,
    /// Tax applied on top of the subtotal
    pub tax_rate: f64,
}

impl AppConfig {
    /// Config with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            base_url: base_url.into(),
            environment: "development".to_string(),
            static_dir: PathBuf::from("public"),
            currency: Currency::default(),
            tax_rate: DEFAULT_TAX_RATE,
        }
    }

    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {}", raw))?,
            Err(_) => 3001,
        };

        let currency = match std::env::var("CURRENCY") {
            Ok(raw) => raw.parse::<Currency>().map_err(anyhow::Error::msg)?,
            Err(_) => Currency::default(),
        };

        let tax_rate = match std::env::var("TAX_RATE") {
            Ok(raw) => raw
                .parse::<f64>()
                .with_context(|| format!("TAX_RATE is not a number: {}", raw))?,
            Err(_) => DEFAULT_TAX_RATE,
        };
        if !(0.0..=1.0).contains(&tax_rate) {
            anyhow::bail!("TAX_RATE must be between 0 and 1, got {}", tax_rate);
        }

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            base_url: std::env::var("BASE_URL").unwrap_or_default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            currency,
            tax_rate,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings handed to the preference builder
    pub fn preference_settings(&self) -> PreferenceSettings {
        PreferenceSettings::new(&self.base_url, self.currency)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub payments: BoxedPaymentStrategy,
    /// Receipt mailer (None when no transport is configured)
    pub mailer: Option<ReceiptMailer>,
    /// Preference builder settings
    pub settings: PreferenceSettings,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from the environment with Mercado Pago
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let payments = MercadoPagoStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Mercado Pago: {}", e))?;

        if payments.config().is_test_mode() {
            tracing::warn!("Mercado Pago is using TEST credentials");
        }

        let mail_config = MailConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load mail config: {}", e))?;
        if mail_config.is_enabled() {
            tracing::info!("Receipt transport: {}", mail_config.transport.name());
        } else {
            tracing::warn!("No mail transport configured, receipts will not be sent");
        }

        let mailer = ReceiptMailer::from_config(&mail_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize mail transport: {}", e))?;

        Ok(Self::with_strategies(config, Arc::new(payments), mailer))
    }

    /// Assemble state from explicit parts
    pub fn with_strategies(
        config: AppConfig,
        payments: BoxedPaymentStrategy,
        mailer: Option<ReceiptMailer>,
    ) -> Self {
        Self {
            payments,
            mailer,
            settings: config.preference_settings(),
            config,
        }
    }

    /// Name of the receipt transport for logs and health output
    pub fn email_transport(&self) -> &'static str {
        self.mailer
            .as_ref()
            .map(ReceiptMailer::transport_name)
            .unwrap_or("none")
    }
}
