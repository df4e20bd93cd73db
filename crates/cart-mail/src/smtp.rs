//! # SMTP Transport
//!
//! Sends receipts through an SMTP relay using `lettre`.

use crate::config::SmtpSettings;
use async_trait::async_trait;
use cart_core::{DeliveryReceipt, EmailError, EmailStrategy, ReceiptEmail};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, instrument};

const TRANSPORT: &str = "smtp";

/// SMTP relay mailer
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings, timeout: Duration) -> Result<Self, EmailError> {
        let builder = if settings.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| EmailError::Configuration(format!("Invalid SMTP relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        let mut builder = builder.port(settings.port).timeout(Some(timeout));

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// Build the MIME message for a receipt
pub(crate) fn build_message(email: &ReceiptEmail) -> Result<Message, EmailError> {
    let from: Mailbox = email
        .from
        .parse()
        .map_err(|_| EmailError::InvalidAddress(email.from.clone()))?;
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|_| EmailError::InvalidAddress(email.to.clone()))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())
        .map_err(|e| EmailError::Delivery {
            transport: TRANSPORT.to_string(),
            message: e.to_string(),
        })
}

#[async_trait]
impl EmailStrategy for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &ReceiptEmail) -> Result<DeliveryReceipt, EmailError> {
        let message = build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| EmailError::Delivery {
                transport: TRANSPORT.to_string(),
                message: e.to_string(),
            })?;

        debug!("SMTP relay accepted email: code={}", response.code());

        Ok(DeliveryReceipt {
            message_id: response.first_line().map(String::from),
        })
    }

    fn transport_name(&self) -> &'static str {
        TRANSPORT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> ReceiptEmail {
        ReceiptEmail::new(
            to,
            "Shop <receipts@example.mx>",
            "Your purchase receipt",
            "<p>Total: $232.00</p>",
        )
    }

    #[test]
    fn test_build_message() {
        let message = build_message(&email("buyer@example.mx")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Your purchase receipt"));
        assert!(raw.contains("To: buyer@example.mx"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn test_invalid_recipient() {
        let err = build_message(&email("not an address")).unwrap_err();
        assert!(matches!(err, EmailError::InvalidAddress(addr) if addr == "not an address"));
    }

    #[tokio::test]
    async fn test_transport_builds_without_connecting() {
        let mut settings = SmtpSettings::new("localhost");
        settings.port = 1025;
        settings.tls = false;

        let mailer = SmtpMailer::new(&settings, Duration::from_secs(1)).unwrap();
        assert_eq!(mailer.transport_name(), "smtp");
    }
}
