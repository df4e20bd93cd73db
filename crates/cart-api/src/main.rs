//! # cart-checkout
//!
//! Checkout backend for a storefront paying through Mercado Pago.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export MP_ACCESS_TOKEN=TEST-...
//! export BASE_URL=https://shop.example.mx
//! export RESEND_API_KEY=re_...   # optional, enables receipts
//!
//! # Run the server
//! cart-checkout
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.payments.provider_name());
    info!(
        "Currency: {}, tax rate: {}",
        state.settings.currency, state.config.tax_rate
    );
    if !state.settings.is_secure() {
        info!("BASE_URL is not https, preferences will carry no back URLs");
    }

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("cart-checkout starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: POST http://{}/api/create_preference", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  cart-checkout
  ━━━━━━━━━━━━━━━━━━━━━━━
  Mercado Pago checkout backend
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
