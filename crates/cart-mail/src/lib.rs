//! # cart-mail
//!
//! Receipt email transports for cart-checkout.
//!
//! Two `EmailStrategy` implementations, chosen by `MailConfig`:
//!
//! 1. **ResendMailer** - Resend transactional email API over HTTPS
//! 2. **SmtpMailer** - any SMTP relay (STARTTLS, or plaintext for local catchers)
//!
//! `ReceiptMailer` wraps the selected transport with the sender address,
//! subject line and an upper bound on delivery time.

pub mod config;
pub mod resend;
pub mod smtp;

use cart_core::{BoxedEmailStrategy, DeliveryReceipt, EmailError, ReceiptEmail};
use std::sync::Arc;
use std::time::Duration;

// Re-exports
pub use config::{MailConfig, MailTransport, SmtpSettings};
pub use resend::ResendMailer;
pub use smtp::SmtpMailer;

/// Build the transport selected by the config, or `None` when disabled
pub fn build_transport(config: &MailConfig) -> Result<Option<BoxedEmailStrategy>, EmailError> {
    let strategy: BoxedEmailStrategy = match &config.transport {
        MailTransport::Resend {
            api_key,
            api_base_url,
        } => Arc::new(ResendMailer::new(
            api_key.clone(),
            api_base_url.clone(),
            config.timeout,
        )?),
        MailTransport::Smtp(settings) => Arc::new(SmtpMailer::new(settings, config.timeout)?),
        MailTransport::Disabled => return Ok(None),
    };

    Ok(Some(strategy))
}

/// Sends purchase receipts through one transport
#[derive(Clone)]
pub struct ReceiptMailer {
    strategy: BoxedEmailStrategy,
    from_address: String,
    subject: String,
    timeout: Duration,
}

impl ReceiptMailer {
    pub fn new(strategy: BoxedEmailStrategy, config: &MailConfig) -> Self {
        Self {
            strategy,
            from_address: config.from_address.clone(),
            subject: config.subject.clone(),
            timeout: config.timeout,
        }
    }

    /// Build from config; `None` when receipts are disabled
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, EmailError> {
        Ok(build_transport(config)?.map(|strategy| Self::new(strategy, config)))
    }

    pub fn transport_name(&self) -> &'static str {
        self.strategy.transport_name()
    }

    /// Compose the receipt message for a recipient
    pub fn compose(&self, to: &str, html: String) -> ReceiptEmail {
        ReceiptEmail::new(to, self.from_address.clone(), self.subject.clone(), html)
    }

    /// Send a receipt, giving up after the configured timeout
    pub async fn send_receipt(&self, to: &str, html: String) -> Result<DeliveryReceipt, EmailError> {
        let email = self.compose(to, html);

        match tokio::time::timeout(self.timeout, self.strategy.send(&email)).await {
            Ok(result) => result,
            Err(_) => Err(EmailError::Timeout(self.timeout.as_secs())),
        }
    }
}
