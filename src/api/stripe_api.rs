use crate::error::{CopydeskError, StripeError};
use crate::types::stripe::{CheckoutSession, PriceList};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Parameters of a one-time-payment checkout session for a single price.
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    pub price_id: String,
    pub client_reference_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutSessionParams {
    fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("line_items[0][price]", self.price_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("mode", "payment".to_string()),
            ("client_reference_id", self.client_reference_id.clone()),
            ("success_url", self.success_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
        ]
    }
}

/// Thin client for the handful of Stripe REST calls the checkout flow needs.
#[derive(Clone)]
pub struct StripeApi {
    client: reqwest::Client,
    base: Url,
    secret_key: String,
}

impl StripeApi {
    pub fn new(client: reqwest::Client, base: Url, secret_key: impl Into<String>) -> Self {
        Self {
            client,
            base,
            secret_key: secret_key.into(),
        }
    }

    /// Active prices with their products expanded, at most `limit` of them.
    pub async fn list_active_prices(&self, limit: u32) -> Result<PriceList, CopydeskError> {
        let query = [
            ("active", "true".to_string()),
            ("limit", limit.to_string()),
            ("expand[]", "data.product".to_string()),
        ];
        let req = self.client.get(self.base.join("v1/prices")?).query(&query);
        self.send(req).await
    }

    /// Prices carrying `lookup_key`; Stripe matches lookup keys exactly.
    pub async fn prices_by_lookup_key(&self, lookup_key: &str) -> Result<PriceList, CopydeskError> {
        let query = [
            ("lookup_keys[]", lookup_key.to_string()),
            ("expand[]", "data.product".to_string()),
        ];
        let req = self.client.get(self.base.join("v1/prices")?).query(&query);
        self.send(req).await
    }

    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, CopydeskError> {
        let req = self
            .client
            .post(self.base.join("v1/checkout/sessions")?)
            .form(&params.to_form());
        let session: CheckoutSession = self.send(req).await?;
        debug!(session_id = %session.id, "Stripe checkout session created");
        Ok(session)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, CopydeskError> {
        let resp = req
            .bearer_auth(&self.secret_key)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            error!(%status, "Stripe request failed");
            return Err(match serde_json::from_slice::<StripeError>(&bytes) {
                Ok(stripe_err) => CopydeskError::StripeServerError(stripe_err),
                Err(_) => CopydeskError::UpstreamStatus(status),
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
