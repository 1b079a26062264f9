use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, models::Product};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
    pub stock: String,
    pub short_desc: String,
    pub long_desc: String,
    pub category_id: String,
    pub image_id: String,
    pub active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub title: String,
    pub price: i64,
    pub stock: i32,
    pub short_desc: String,
    pub long_desc: String,
    pub category_id: Option<i32>,
    pub image_id: Option<i32>,
    pub active: bool,
}

impl ProductForm {
    pub fn validate(self) -> Result<ProductInput, AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }

        let price = parse_price(&self.price).map_err(AppError::Validation)?;

        let stock = match self.stock.trim() {
            "" => 0,
            raw => raw
                .parse::<i32>()
                .ok()
                .filter(|s| *s >= 0)
                .ok_or_else(|| {
                    AppError::Validation("Stock must be a non-negative whole number".into())
                })?,
        };

        Ok(ProductInput {
            title,
            price,
            stock,
            short_desc: self.short_desc.trim().to_string(),
            long_desc: self.long_desc.trim().to_string(),
            category_id: optional_id(&self.category_id, "category")?,
            image_id: optional_id(&self.image_id, "image")?,
            active: self.active.is_some(),
        })
    }
}

fn optional_id(raw: &str, what: &str) -> Result<Option<i32>, AppError> {
    match raw.trim() {
        "" => Ok(None),
        value => value
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid {what} selection"))),
    }
}

pub fn parse_price(raw: &str) -> Result<i64, String> {
    let raw = raw.trim().replace(' ', "");
    if raw.is_empty() {
        return Err("Price is required".into());
    }

    let invalid = || format!("Price `{raw}` is not a valid amount");
    let normalized = raw.replace(',', ".");
    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized.as_str(), ""),
    };

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) || fraction.len() > 2 {
        return Err(invalid());
    }

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse::<i64>().map_err(|_| invalid())?,
    };

    whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(invalid)
}

pub fn price_input_value(price: i64) -> String {
    format!("{}.{:02}", price / 100, price % 100)
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kroner_into_ore() {
        assert_eq!(parse_price("149"), Ok(14900));
        assert_eq!(parse_price("149.5"), Ok(14950));
        assert_eq!(parse_price("149,90"), Ok(14990));
        assert_eq!(parse_price(" 1 299 "), Ok(129900));
        assert_eq!(parse_price("0"), Ok(0));
    }

    #[test]
    fn rejects_non_numeric_and_negative_prices() {
        assert!(parse_price("").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("-5").is_err());
        assert!(parse_price("1.999").is_err());
        assert!(parse_price(".50").is_err());
        assert!(parse_price("1.2.3").is_err());
    }

    #[test]
    fn form_requires_title_and_valid_stock() {
        let form = ProductForm {
            title: "  ".into(),
            price: "10".into(),
            ..Default::default()
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        let form = ProductForm {
            title: "Vitamin D".into(),
            price: "10".into(),
            stock: "-1".into(),
            ..Default::default()
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn form_maps_blank_references_to_none() {
        let input = ProductForm {
            title: "Vitamin D".into(),
            price: "99,00".into(),
            stock: "12".into(),
            category_id: "3".into(),
            active: Some("on".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(input.price, 9900);
        assert_eq!(input.stock, 12);
        assert_eq!(input.category_id, Some(3));
        assert_eq!(input.image_id, None);
        assert!(input.active);
    }

    #[test]
    fn input_value_round_trips_through_parser() {
        assert_eq!(price_input_value(14990), "149.90");
        assert_eq!(parse_price(&price_input_value(14990)), Ok(14990));
    }
}
