use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use super::{
    CheckoutRedirect, CheckoutSessionRequest, PaymentError, PaymentNotification, PaymentProvider,
    signature,
};
use crate::{config::PaymentConfig, models::PaymentMethod};

const COMPLETED_EVENT: &str = "checkout.session.completed";

#[derive(Clone)]
pub struct StripeProvider {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
    webhook_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: EventObject,
}

#[derive(Debug, Deserialize)]
struct EventObject {
    id: Option<String>,
    client_reference_id: Option<String>,
}

impl StripeProvider {
    pub fn from_config(config: &PaymentConfig) -> Option<Self> {
        let secret_key = config.stripe_secret_key.clone()?;
        Some(Self {
            http: reqwest::Client::new(),
            api_base: config.stripe_api_base.clone(),
            secret_key,
            webhook_secret: config.stripe_webhook_secret.clone(),
        })
    }

    fn form_params(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            ("client_reference_id".to_string(), request.order_id.clone()),
            ("customer_email".to_string(), request.email.clone()),
            (
                "payment_method_types[0]".to_string(),
                request.method.as_str().to_string(),
            ),
            (
                "metadata[order_id]".to_string(),
                request.order_id.clone(),
            ),
        ];

        for (i, item) in request.line_items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            params.push((
                format!("{prefix}[price_data][currency]"),
                request.currency.clone(),
            ));
            params.push((
                format!("{prefix}[price_data][product_data][name]"),
                item.name.clone(),
            ));
            params.push((
                format!("{prefix}[price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            params.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        }

        params
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    fn name(&self) -> &'static str {
        "stripe"
    }

    fn supports(&self, method: PaymentMethod) -> bool {
        method.is_external()
    }

    async fn create_checkout(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutRedirect, PaymentError> {
        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&Self::form_params(request))
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(PaymentError::Response(format!("{status}: {message}")));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Response(e.to_string()))?;
        let url = session
            .url
            .ok_or_else(|| PaymentError::Response("checkout session has no url".to_string()))?;

        tracing::info!(order_id = %request.order_id, session_id = %session.id, "checkout session created");
        Ok(CheckoutRedirect {
            session_id: session.id,
            url,
        })
    }

    fn parse_notification(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<PaymentNotification, PaymentError> {
        let secret = self
            .webhook_secret
            .as_deref()
            .ok_or(PaymentError::NotConfigured)?;
        let header = signature
            .ok_or_else(|| PaymentError::InvalidSignature("missing signature header".to_string()))?;

        signature::verify(
            payload,
            header,
            secret,
            Utc::now().timestamp(),
            signature::DEFAULT_TOLERANCE_SECS,
        )?;

        let event: Event = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::InvalidPayload(e.to_string()))?;

        if event.event_type != COMPLETED_EVENT {
            return Ok(PaymentNotification::Other {
                event_type: event.event_type,
            });
        }

        let session_id = event
            .data
            .object
            .id
            .ok_or_else(|| PaymentError::InvalidPayload("session id missing".to_string()))?;
        Ok(PaymentNotification::CheckoutCompleted {
            session_id,
            order_id: event.data.object.client_reference_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::CheckoutLineItem;

    fn provider(webhook_secret: Option<&str>) -> StripeProvider {
        StripeProvider::from_config(&PaymentConfig {
            stripe_secret_key: Some("sk_test".to_string()),
            stripe_webhook_secret: webhook_secret.map(str::to_string),
            ..PaymentConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn not_built_without_secret_key() {
        assert!(StripeProvider::from_config(&PaymentConfig::default()).is_none());
    }

    #[test]
    fn encodes_line_items_as_nested_form_fields() {
        let request = CheckoutSessionRequest {
            order_id: "VB-1".to_string(),
            email: "x@y.no".to_string(),
            method: PaymentMethod::Vipps,
            currency: "nok".to_string(),
            line_items: vec![CheckoutLineItem {
                name: "Omega 3".to_string(),
                unit_amount: 19900,
                quantity: 2,
            }],
            success_url: "http://localhost/order/VB-1".to_string(),
            cancel_url: "http://localhost/cart".to_string(),
        };

        let params = StripeProvider::form_params(&request);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("payment_method_types[0]"), Some("vipps"));
        assert_eq!(get("client_reference_id"), Some("VB-1"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("19900"));
        assert_eq!(get("line_items[0][quantity]"), Some("2"));
        assert_eq!(get("line_items[0][price_data][currency]"), Some("nok"));
    }

    #[test]
    fn parses_completed_event() {
        let provider = provider(Some("whsec"));
        let body = br#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1","client_reference_id":"VB-1"}}}"#;
        let header = signature::signature_header(body, "whsec", Utc::now().timestamp()).unwrap();

        let notification = provider.parse_notification(body, Some(&header)).unwrap();
        assert_eq!(
            notification,
            PaymentNotification::CheckoutCompleted {
                session_id: "cs_1".to_string(),
                order_id: Some("VB-1".to_string()),
            }
        );
    }

    #[test]
    fn rejects_notification_without_webhook_secret() {
        let provider = provider(None);
        let result = provider.parse_notification(b"{}", Some("t=1,v1=00"));
        assert!(matches!(result, Err(PaymentError::NotConfigured)));
    }

    #[test]
    fn rejects_missing_signature_header() {
        let provider = provider(Some("whsec"));
        let result = provider.parse_notification(b"{}", None);
        assert!(matches!(result, Err(PaymentError::InvalidSignature(_))));
    }
}
