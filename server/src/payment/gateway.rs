//! reqwest-backed gateway client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{PaymentAck, PaymentError, PaymentGateway, PaymentRequest};

/// Talks to an external collection gateway over HTTPS.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    reference: String,
    #[serde(default)]
    status: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate(&self, request: PaymentRequest) -> Result<PaymentAck, PaymentError> {
        let url = format!("{}/collections", self.base_url.trim_end_matches('/'));
        debug!(target: "payment", order = %request.order_id, "Initiating collection");

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        let http_status = response.status();
        if http_status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(target: "payment", order = %request.order_id, status = %http_status, "Collection rejected");
            return Err(PaymentError::Rejected(body));
        }
        if !http_status.is_success() {
            return Err(PaymentError::Gateway(format!(
                "Gateway returned {http_status}"
            )));
        }

        let parsed: GatewayResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        Ok(PaymentAck {
            order_id: request.order_id,
            reference: parsed.reference,
            status: parsed.status.unwrap_or_else(|| "pending".to_string()),
            amount: request.amount,
        })
    }
}
