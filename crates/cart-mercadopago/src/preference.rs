//! # Mercado Pago Checkout Preferences
//!
//! Implementation of the Checkout Pro preferences API
//! (`POST /checkout/preferences`). A preference yields the `init_point`
//! URL the buyer is redirected to.

use crate::config::MercadoPagoConfig;
use async_trait::async_trait;
use cart_core::{
    CheckoutError, CheckoutResult, PaymentStrategy, PreferenceCreated, PreferenceRequest,
};
use reqwest::Client;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "mercadopago";

/// Mercado Pago preference strategy
///
/// Uses Mercado Pago's hosted checkout; card data never touches this service.
pub struct MercadoPagoStrategy {
    config: MercadoPagoConfig,
    client: Client,
}

impl MercadoPagoStrategy {
    /// Create a new Mercado Pago strategy
    pub fn new(config: MercadoPagoConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        let config = MercadoPagoConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &MercadoPagoConfig {
        &self.config
    }
}

#[async_trait]
impl PaymentStrategy for MercadoPagoStrategy {
    #[instrument(skip(self, preference), fields(reference = %preference.external_reference))]
    async fn create_preference(
        &self,
        preference: &PreferenceRequest,
    ) -> CheckoutResult<PreferenceCreated> {
        if preference.items.is_empty() {
            return Err(CheckoutError::EmptyItems);
        }

        debug!(
            "Creating Mercado Pago preference: {} items, back_urls={}",
            preference.items.len(),
            preference.back_urls.is_some()
        );

        // One key per attempt; nothing here retries
        let idempotency_key = Uuid::new_v4().to_string();

        let response = self
            .client
            .post(self.config.preferences_url())
            .header("Authorization", self.config.auth_header())
            .header("X-Idempotency-Key", &idempotency_key)
            .json(preference)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Mercado Pago API error: status={}, body={}", status, body);

            return Err(CheckoutError::Provider {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                details: body,
            });
        }

        let created: PreferenceCreated = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!(
                "Failed to parse Mercado Pago response: {}",
                e
            ))
        })?;

        info!(
            "Created Mercado Pago preference: id={}, url={}",
            created.id, created.init_point
        );

        Ok(created)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::{CartItem, CheckoutRequest, Currency, Order, PreferenceSettings, DEFAULT_TAX_RATE};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn preference(base_url: &str) -> PreferenceRequest {
        let request = CheckoutRequest {
            items: vec![CartItem::new("Widget", 2.0, 100.0)],
            payer_email: Some("buyer@example.mx".into()),
            external_reference: Some("ORDER-1".into()),
        };
        let order = Order::from_request(&request, DEFAULT_TAX_RATE).unwrap();
        let settings = PreferenceSettings::new(base_url, Currency::MXN);
        // The reference is supplied, so the clock value is never read
        PreferenceRequest::build(&order, &settings, Default::default())
    }

    fn strategy(server: &MockServer) -> MercadoPagoStrategy {
        let config = MercadoPagoConfig::new("TEST-token").with_api_base_url(server.uri());
        MercadoPagoStrategy::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_create_preference_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/checkout/preferences"))
            .and(header("authorization", "Bearer TEST-token"))
            .and(header_exists("x-idempotency-key"))
            .and(body_partial_json(json!({
                "items": [{
                    "title": "Widget",
                    "quantity": 2,
                    "currency_id": "MXN",
                    "unit_price": 100.0
                }],
                "payer": { "email": "buyer@example.mx" },
                "external_reference": "ORDER-1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "123-pref",
                "init_point": "https://www.mercadopago.com.mx/checkout/v1/redirect?pref_id=123-pref",
                "sandbox_init_point": "https://sandbox.mercadopago.com.mx/checkout/v1/redirect?pref_id=123-pref",
                "collector_id": 42
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = strategy(&server)
            .create_preference(&preference("http://localhost:3001"))
            .await
            .unwrap();

        assert_eq!(created.id, "123-pref");
        assert!(created.init_point.contains("pref_id=123-pref"));
        assert!(created.sandbox_init_point.is_some());
    }

    #[tokio::test]
    async fn test_provider_error_keeps_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/checkout/preferences"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"message":"invalid access token","status":401}"#),
            )
            .mount(&server)
            .await;

        let err = strategy(&server)
            .create_preference(&preference("http://localhost:3001"))
            .await
            .unwrap_err();

        match err {
            CheckoutError::Provider {
                provider,
                status,
                details,
            } => {
                assert_eq!(provider, "mercadopago");
                assert_eq!(status, 401);
                assert_eq!(details, r#"{"message":"invalid access token","status":401}"#);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = strategy(&server)
            .create_preference(&preference("http://localhost:3001"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_empty_preference_is_not_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut pref = preference("http://localhost:3001");
        pref.items.clear();

        let err = strategy(&server).create_preference(&pref).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyItems));
    }

    #[test]
    fn test_provider_name() {
        let strategy = MercadoPagoStrategy::new(MercadoPagoConfig::new("TEST-1")).unwrap();
        assert_eq!(strategy.provider_name(), "mercadopago");
    }
}
