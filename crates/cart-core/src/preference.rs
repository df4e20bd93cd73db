//! # Preference Builder
//!
//! Maps a validated `Order` into the checkout preference body sent to the
//! payment provider.
//!
//! Redirect URLs are only attached when the public base URL is HTTPS; over
//! plain HTTP they are left out entirely, together with `auto_return`.

use crate::currency::Currency;
use crate::order::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Paths (relative to the base URL) the payer is sent back to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackPaths {
    pub success: String,
    pub pending: String,
    pub failure: String,
}

impl Default for BackPaths {
    fn default() -> Self {
        Self {
            success: "/success.html".to_string(),
            pending: "/pending.html".to_string(),
            failure: "/failure.html".to_string(),
        }
    }
}

/// Deployment settings the builder depends on
#[derive(Debug, Clone)]
pub struct PreferenceSettings {
    /// Public base URL of the storefront (e.g., "https://shop.example.mx")
    pub base_url: String,
    /// Currency attached to every item
    pub currency: Currency,
    /// Back-redirect paths
    pub back_paths: BackPaths,
    /// Prefix for generated external references
    pub reference_prefix: String,
}

impl PreferenceSettings {
    pub fn new(base_url: impl Into<String>, currency: Currency) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            currency,
            back_paths: BackPaths::default(),
            reference_prefix: "ORDER".to_string(),
        }
    }

    /// Whether the base URL uses secure transport
    pub fn is_secure(&self) -> bool {
        self.base_url
            .get(..8)
            .map(|scheme| scheme.eq_ignore_ascii_case("https://"))
            .unwrap_or(false)
    }

    /// Back URLs, or `None` when the base URL is not HTTPS
    pub fn back_urls(&self) -> Option<BackUrls> {
        if !self.is_secure() {
            return None;
        }

        Some(BackUrls {
            success: format!("{}{}", self.base_url, self.back_paths.success),
            pending: format!("{}{}", self.base_url, self.back_paths.pending),
            failure: format!("{}{}", self.base_url, self.back_paths.failure),
        })
    }

    /// Generated external reference for the given instant
    pub fn generated_reference(&self, now: DateTime<Utc>) -> String {
        format!("{}-{}", self.reference_prefix, now.timestamp_millis())
    }
}

/// Item in the provider's preference body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceItem {
    pub title: String,
    pub quantity: u32,
    pub currency_id: Currency,
    pub unit_price: f64,
}

/// Payer prefill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: String,
    pub pending: String,
    pub failure: String,
}

/// Checkout preference body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<Payer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_urls: Option<BackUrls>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_return: Option<String>,

    pub external_reference: String,
}

impl PreferenceRequest {
    /// Build the preference for an order.
    ///
    /// `now` is only used when the order carries no external reference.
    pub fn build(order: &Order, settings: &PreferenceSettings, now: DateTime<Utc>) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| PreferenceItem {
                title: item.title.clone(),
                quantity: item.quantity,
                currency_id: settings.currency,
                unit_price: item.unit_price,
            })
            .collect();

        let back_urls = settings.back_urls();
        let auto_return = back_urls.as_ref().map(|_| "approved".to_string());

        let external_reference = order
            .external_reference
            .clone()
            .unwrap_or_else(|| settings.generated_reference(now));

        Self {
            items,
            payer: order.payer_email.clone().map(|email| Payer { email }),
            back_urls,
            auto_return,
            external_reference,
        }
    }
}
