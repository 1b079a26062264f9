use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub price: i64,
    pub active: bool,
    pub stock: i32,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub image_id: Option<i32>,
    pub short_desc: String,
    pub long_desc: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub sort_order: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: String,
    pub email: String,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: OrderStatus,
    pub provider_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema, FromQueryResult)]
pub struct ImageMeta {
    pub id: i32,
    pub filename: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    // `created|pending -> completed` is the only transition.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Created | OrderStatus::Pending, OrderStatus::Completed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(OrderStatus::Created),
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(format!("unknown order status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Simulated,
    Card,
    Vipps,
    Unspecified,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Card,
        PaymentMethod::Vipps,
        PaymentMethod::Simulated,
        PaymentMethod::Unspecified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Simulated => "simulated",
            PaymentMethod::Card => "card",
            PaymentMethod::Vipps => "vipps",
            PaymentMethod::Unspecified => "unspecified",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Simulated => "Test payment",
            PaymentMethod::Card => "Card",
            PaymentMethod::Vipps => "Vipps",
            PaymentMethod::Unspecified => "Pay later (invoice)",
        }
    }

    pub fn is_external(self) -> bool {
        matches!(self, PaymentMethod::Card | PaymentMethod::Vipps)
    }

    pub fn initial_status(self) -> OrderStatus {
        match self {
            PaymentMethod::Unspecified => OrderStatus::Created,
            _ => OrderStatus::Pending,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(PaymentMethod::Simulated),
            "card" => Ok(PaymentMethod::Card),
            "vipps" => Ok(PaymentMethod::Vipps),
            "" | "unspecified" => Ok(PaymentMethod::Unspecified),
            other => Err(format!("unknown payment method `{other}`")),
        }
    }
}

pub fn format_amount(amount: i64, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!(
        "{sign}{}.{:02} {}",
        abs / 100,
        abs % 100,
        currency.to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_is_terminal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Created.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Completed.is_terminal());
    }

    #[test]
    fn blank_method_is_unspecified() {
        assert_eq!("".parse::<PaymentMethod>(), Ok(PaymentMethod::Unspecified));
        assert_eq!(" Vipps ".parse::<PaymentMethod>(), Ok(PaymentMethod::Vipps));
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn formats_minor_units() {
        assert_eq!(format_amount(25000, "nok"), "250.00 NOK");
        assert_eq!(format_amount(1999, "eur"), "19.99 EUR");
        assert_eq!(format_amount(5, "nok"), "0.05 NOK");
    }
}
