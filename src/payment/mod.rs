pub mod signature;
pub mod stripe;

use async_trait::async_trait;
use thiserror::Error;

use crate::{error::AppError, models::PaymentMethod};

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment provider is not configured")]
    NotConfigured,

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("provider request failed: {0}")]
    Request(String),

    #[error("provider responded with an error: {0}")]
    Response(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotConfigured => AppError::PaymentUnavailable,
            PaymentError::InvalidSignature(_) => {
                tracing::warn!(error = %err, "payment notification rejected");
                AppError::InvalidSignature
            }
            PaymentError::InvalidPayload(_) => {
                tracing::warn!(error = %err, "payment notification rejected");
                AppError::Validation(err.to_string())
            }
            PaymentError::Request(_) | PaymentError::Response(_) => {
                AppError::Payment(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub order_id: String,
    pub email: String,
    pub method: PaymentMethod,
    pub currency: String,
    pub line_items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentNotification {
    CheckoutCompleted {
        session_id: String,
        order_id: Option<String>,
    },
    Other {
        event_type: String,
    },
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, method: PaymentMethod) -> bool;

    async fn create_checkout(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutRedirect, PaymentError>;

    fn parse_notification(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<PaymentNotification, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_payload_is_not_reported_as_bad_signature() {
        let err = AppError::from(PaymentError::InvalidPayload("expected value".into()));
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("expected value")));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let err = AppError::from(PaymentError::InvalidSignature("no match".into()));
        assert!(matches!(err, AppError::InvalidSignature));
    }
}
