//! # cart-core
//!
//! Core types and traits for the cart-checkout service.
//!
//! This crate provides:
//! - `CheckoutRequest`, `CartItem` coercion and `OrderTotals` calculation
//! - `PreferenceRequest` builder for the payment provider
//! - `render_receipt` for the buyer's HTML receipt
//! - `PaymentStrategy` and `EmailStrategy` traits for external collaborators
//! - `CheckoutError` / `EmailError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{Order, PreferenceRequest, PreferenceSettings, Currency, DEFAULT_TAX_RATE};
//!
//! let order = Order::from_request(&request, DEFAULT_TAX_RATE)?;
//! let settings = PreferenceSettings::new("https://shop.example.mx", Currency::MXN);
//! let preference = PreferenceRequest::build(&order, &settings, chrono::Utc::now());
//!
//! let created = strategy.create_preference(&preference).await?;
//! // Redirect buyer to created.init_point
//! ```

pub mod currency;
pub mod error;
pub mod order;
pub mod preference;
pub mod receipt;
pub mod strategy;

// Re-exports for convenience
pub use currency::{format_amount, Currency};
pub use error::{CheckoutError, CheckoutResult, EmailError};
pub use order::{
    coerce_items, CartItem, CheckoutRequest, CheckoutResponse, LineItem, NumericInput, Order,
    OrderTotals, DEFAULT_TAX_RATE,
};
pub use preference::{BackPaths, BackUrls, Payer, PreferenceItem, PreferenceRequest, PreferenceSettings};
pub use receipt::{render_receipt, ReceiptEmail, RECEIPT_STATUS_LINE};
pub use strategy::{
    BoxedEmailStrategy, BoxedPaymentStrategy, DeliveryReceipt, EmailStrategy, PaymentStrategy,
    PreferenceCreated,
};
