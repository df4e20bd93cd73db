//! # cart-api
//!
//! HTTP API layer for cart-checkout.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout endpoint that turns a cart into a Mercado Pago preference
//! - Static hosting for the storefront pages
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/create_preference` | Create checkout preference |
//! | GET | `/*` | Static storefront files |

pub mod checkout;
pub mod handlers;
pub mod routes;
pub mod state;

pub use checkout::process_checkout;
pub use handlers::ErrorResponse;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
