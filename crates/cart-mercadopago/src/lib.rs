//! # cart-mercadopago
//!
//! Mercado Pago payment strategy for cart-checkout.
//!
//! **MercadoPagoStrategy** creates Checkout Pro preferences:
//! - Dynamic line items with a single currency
//! - Payer email prefill
//! - Back URLs and `auto_return` when the storefront is served over HTTPS
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_mercadopago::MercadoPagoStrategy;
//! use cart_core::PaymentStrategy;
//!
//! // Create strategy from environment
//! let strategy = MercadoPagoStrategy::from_env()?;
//!
//! // Create the preference
//! let created = strategy.create_preference(&preference).await?;
//!
//! // Redirect buyer to created.init_point
//! ```

pub mod config;
pub mod preference;

// Re-exports
pub use config::MercadoPagoConfig;
pub use preference::MercadoPagoStrategy;
