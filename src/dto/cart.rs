use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{cart::CartSummary, error::AppError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartAddition {
    pub product_id: i32,
    pub quantity: u32,
}

impl AddToCartForm {
    pub fn new(product_id: i32, quantity: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            quantity: quantity.to_string(),
        }
    }

    pub fn validate(&self) -> Result<CartAddition, AppError> {
        let product_id = parse_product_id(&self.product_id)?;
        let quantity = match self.quantity.trim() {
            "" => 1,
            raw => {
                let requested = raw
                    .parse::<i64>()
                    .map_err(|_| AppError::Validation(format!("Quantity `{raw}` is not a whole number")))?;
                u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
            }
        };
        Ok(CartAddition {
            product_id,
            quantity,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

impl RemoveFromCartForm {
    pub fn new(product_id: i32) -> Self {
        Self {
            product_id: product_id.to_string(),
        }
    }

    pub fn validate(&self) -> Result<i32, AppError> {
        parse_product_id(&self.product_id)
    }
}

fn parse_product_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation("Invalid product selection".into()))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineDto {
    pub product_id: i32,
    pub title: String,
    pub unit_price: i64,
    pub quantity: u32,
    pub line_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartDto {
    pub lines: Vec<CartLineDto>,
    pub total: i64,
    pub item_count: u64,
    pub currency: String,
}

impl CartDto {
    pub fn from_summary(summary: CartSummary, currency: &str) -> Self {
        Self {
            lines: summary
                .lines
                .into_iter()
                .map(|line| CartLineDto {
                    product_id: line.product.id,
                    title: line.product.title,
                    unit_price: line.product.price,
                    quantity: line.quantity,
                    line_total: line.line_total,
                })
                .collect(),
            total: summary.total,
            item_count: summary.item_count,
            currency: currency.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_and_clamps_to_one() {
        for raw in ["", "  ", "0", "-1", "-9999999999"] {
            let addition = AddToCartForm::new(3, raw).validate().unwrap();
            assert_eq!(addition.quantity, 1, "{raw:?}");
        }
        assert_eq!(AddToCartForm::new(3, " 4 ").validate().unwrap().quantity, 4);
        assert_eq!(
            AddToCartForm::new(3, "99999999999").validate().unwrap().quantity,
            u32::MAX
        );
    }

    #[test]
    fn garbage_is_a_validation_error() {
        assert!(matches!(
            AddToCartForm::new(3, "two").validate(),
            Err(AppError::Validation(_))
        ));
        let form = AddToCartForm {
            product_id: String::new(),
            quantity: "1".into(),
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
        let form = RemoveFromCartForm {
            product_id: "x".into(),
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }
}
