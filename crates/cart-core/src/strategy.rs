//! # Provider Strategies
//!
//! Strategy traits for the two external collaborators of a checkout:
//! the payment provider that creates preferences, and the email transport
//! that delivers receipts.
//!
//! ```text
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │   PaymentStrategy (trait)    │      │    EmailStrategy (trait)     │
//! │  ├── create_preference()     │      │  ├── send()                  │
//! │  └── provider_name()         │      │  └── transport_name()        │
//! └──────────────────────────────┘      └──────────────────────────────┘
//!               ▲                                     ▲
//!               │                          ┌──────────┴──────────┐
//!   ┌───────────┴───────────┐      ┌───────┴──────┐      ┌───────┴──────┐
//!   │ MercadoPagoStrategy   │      │ ResendMailer │      │  SmtpMailer  │
//!   └───────────────────────┘      └──────────────┘      └──────────────┘
//! ```

use crate::error::{CheckoutResult, EmailError};
use crate::order::CheckoutResponse;
use crate::preference::PreferenceRequest;
use crate::receipt::ReceiptEmail;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A preference accepted by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceCreated {
    pub id: String,
    pub init_point: String,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
}

impl From<PreferenceCreated> for CheckoutResponse {
    fn from(created: PreferenceCreated) -> Self {
        CheckoutResponse {
            id: created.id,
            init_point: created.init_point,
            sandbox_init_point: created.sandbox_init_point,
        }
    }
}

/// Payment provider that turns a preference body into a payable checkout.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a checkout preference.
    ///
    /// Non-success responses must come back as `CheckoutError::Provider`
    /// carrying the upstream status and body untouched.
    async fn create_preference(
        &self,
        preference: &PreferenceRequest,
    ) -> CheckoutResult<PreferenceCreated>;

    /// Get the provider name (for logging and health output).
    fn provider_name(&self) -> &'static str;
}

/// Acknowledgment from an email transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Transport-assigned message id, when the transport returns one
    pub message_id: Option<String>,
}

/// Email transport used for purchase receipts.
#[async_trait]
pub trait EmailStrategy: Send + Sync {
    async fn send(&self, email: &ReceiptEmail) -> Result<DeliveryReceipt, EmailError>;

    fn transport_name(&self) -> &'static str;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Type alias for a boxed email strategy (dynamic dispatch)
pub type BoxedEmailStrategy = Arc<dyn EmailStrategy>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_into_response() {
        let created: PreferenceCreated = serde_json::from_str(
            r#"{"id":"123-abc","init_point":"https://mp/init","collector_id":99}"#,
        )
        .unwrap();
        let response = CheckoutResponse::from(created);

        assert_eq!(response.id, "123-abc");
        assert_eq!(response.init_point, "https://mp/init");
        assert_eq!(response.sandbox_init_point, None);
    }
}
