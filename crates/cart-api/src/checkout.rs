//! # Checkout Flow
//!
//! One checkout request, start to finish:
//!
//! ```text
//! Validating → BuildingRequest → CallingProvider → {Success | ProviderError}
//!            → (optional) SendingReceipt → Responding
//! ```
//!
//! The receipt step runs only after the provider accepted the preference
//! and is awaited before responding. Its failure is logged and never
//! changes the response.

use crate::state::AppState;
use cart_core::{
    render_receipt, CheckoutRequest, CheckoutResponse, CheckoutResult, Order, PreferenceRequest,
};
use cart_mail::ReceiptMailer;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// Run the checkout flow for one request
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn process_checkout(
    state: &AppState,
    request: CheckoutRequest,
) -> CheckoutResult<CheckoutResponse> {
    let order = Order::from_request(&request, state.config.tax_rate)?;

    let preference = PreferenceRequest::build(&order, &state.settings, Utc::now());

    info!(
        "Creating preference: reference={}, {} units, total={}, back_urls={}",
        preference.external_reference,
        order.item_count(),
        state.settings.currency.display(order.totals.total),
        preference.back_urls.is_some()
    );

    let created = state.payments.create_preference(&preference).await?;
    let response = CheckoutResponse::from(created);

    info!("Created preference: {}", response.id);

    match (order.payer_email.as_deref(), state.mailer.as_ref()) {
        (Some(to), Some(mailer)) => send_receipt(mailer, to, &order, state).await,
        (Some(_), None) => debug!("No mail transport configured, skipping receipt"),
        (None, _) => debug!("No payer email, skipping receipt"),
    }

    Ok(response)
}

/// Best-effort receipt delivery
async fn send_receipt(mailer: &ReceiptMailer, to: &str, order: &Order, state: &AppState) {
    let html = render_receipt(&order.items, &order.totals, state.settings.currency);

    match mailer.send_receipt(to, html).await {
        Ok(receipt) => info!(
            "Receipt sent via {}: message_id={:?}",
            mailer.transport_name(),
            receipt.message_id
        ),
        Err(e) => warn!(
            "Receipt delivery via {} failed, checkout unaffected: {}",
            mailer.transport_name(),
            e
        ),
    }
}
