//! # Resend Transport
//!
//! Sends receipts through the Resend transactional email API
//! (`POST /emails`).

use async_trait::async_trait;
use cart_core::{DeliveryReceipt, EmailError, EmailStrategy, ReceiptEmail};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

const TRANSPORT: &str = "resend";

/// Resend API mailer
pub struct ResendMailer {
    api_key: String,
    api_base_url: String,
    client: Client,
}

impl ResendMailer {
    pub fn new(
        api_key: impl Into<String>,
        api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EmailError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            EmailError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        let api_base_url: String = api_base_url.into();
        Ok(Self {
            api_key: api_key.into(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.api_base_url)
    }
}

#[async_trait]
impl EmailStrategy for ResendMailer {
    #[instrument(skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &ReceiptEmail) -> Result<DeliveryReceipt, EmailError> {
        let body = SendEmailBody {
            from: &email.from,
            to: vec![&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Delivery {
                transport: TRANSPORT.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!("Resend API error: status={}, body={}", status, text);
            return Err(EmailError::Delivery {
                transport: TRANSPORT.to_string(),
                message: format!("HTTP {}: {}", status, text),
            });
        }

        let message_id = serde_json::from_str::<SendEmailResponse>(&text)
            .ok()
            .map(|r| r.id);

        debug!("Resend accepted email: id={:?}", message_id);

        Ok(DeliveryReceipt { message_id })
    }

    fn transport_name(&self) -> &'static str {
        TRANSPORT
    }
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}
