use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderStatus, PaymentMethod};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CheckoutForm {
    pub email: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutNext {
    Provider(String),
    Confirmation(String),
}

#[derive(Debug)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub next: CheckoutNext,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatusDto {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderStatusDto {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
            method: order.method,
            status: order.status,
            created_at: order.created_at,
        }
    }
}
