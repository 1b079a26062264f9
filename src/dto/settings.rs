use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, models::PaymentMethod};

pub const STORE_NAME: &str = "store_name";
pub const TAGLINE: &str = "tagline";
pub const FOOTER_TEXT: &str = "footer_text";
pub const HEADER_BG: &str = "header_bg";
pub const HEADER_TEXT: &str = "header_text";
pub const CARD_BG: &str = "card_bg";
pub const CARD_TEXT: &str = "card_text";
pub const ACCENT: &str = "accent";
pub const BACKGROUND: &str = "background";
pub const FONT: &str = "font";
pub const SHOW_CATEGORIES: &str = "show_categories";
pub const CHECKOUT_CARD: &str = "checkout_card";
pub const CHECKOUT_VIPPS: &str = "checkout_vipps";
pub const CHECKOUT_SIMULATED: &str = "checkout_simulated";
pub const CHECKOUT_INVOICE: &str = "checkout_invoice";

pub const DEFAULTS: &[(&str, &str)] = &[
    (STORE_NAME, "Vitalityboost"),
    (TAGLINE, "Natural supplements for everyday energy"),
    (FOOTER_TEXT, "© Vitalityboost"),
    (HEADER_BG, "#1b5e20"),
    (HEADER_TEXT, "#ffffff"),
    (CARD_BG, "#ffffff"),
    (CARD_TEXT, "#212121"),
    (ACCENT, "#43a047"),
    (BACKGROUND, "#f4f6f3"),
    (FONT, "Helvetica, Arial, sans-serif"),
    (SHOW_CATEGORIES, "true"),
    (CHECKOUT_CARD, "true"),
    (CHECKOUT_VIPPS, "true"),
    (CHECKOUT_SIMULATED, "false"),
    (CHECKOUT_INVOICE, "true"),
];

const MAX_VALUE_LEN: usize = 200;

// Rendered unescaped inside `<style>`.
const THEME_KEYS: &[&str] = &[HEADER_BG, HEADER_TEXT, CARD_BG, CARD_TEXT, ACCENT, BACKGROUND, FONT];
const CSS_FORBIDDEN: &[char] = &['<', '>', '{', '}', ';', '"', '\\'];

pub fn default_for(key: &str) -> Option<&'static str> {
    DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

fn flag_value(on: bool) -> String {
    if on { "true" } else { "false" }.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StoreSettings {
    pub store_name: String,
    pub tagline: String,
    pub footer_text: String,
    pub header_bg: String,
    pub header_text: String,
    pub card_bg: String,
    pub card_text: String,
    pub accent: String,
    pub background: String,
    pub font: String,
    pub show_categories: bool,
    pub checkout_card: bool,
    pub checkout_vipps: bool,
    pub checkout_simulated: bool,
    pub checkout_invoice: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::from_map(&HashMap::new())
    }
}

impl StoreSettings {
    pub fn from_map(rows: &HashMap<String, String>) -> Self {
        let text = |key: &str| {
            rows.get(key)
                .cloned()
                .or_else(|| default_for(key).map(str::to_string))
                .unwrap_or_default()
        };
        let flag = |key: &str| parse_flag(&text(key));

        Self {
            store_name: text(STORE_NAME),
            tagline: text(TAGLINE),
            footer_text: text(FOOTER_TEXT),
            header_bg: text(HEADER_BG),
            header_text: text(HEADER_TEXT),
            card_bg: text(CARD_BG),
            card_text: text(CARD_TEXT),
            accent: text(ACCENT),
            background: text(BACKGROUND),
            font: text(FONT),
            show_categories: flag(SHOW_CATEGORIES),
            checkout_card: flag(CHECKOUT_CARD),
            checkout_vipps: flag(CHECKOUT_VIPPS),
            checkout_simulated: flag(CHECKOUT_SIMULATED),
            checkout_invoice: flag(CHECKOUT_INVOICE),
        }
    }

    pub fn method_enabled(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Card => self.checkout_card,
            PaymentMethod::Vipps => self.checkout_vipps,
            PaymentMethod::Simulated => self.checkout_simulated,
            PaymentMethod::Unspecified => self.checkout_invoice,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SettingsForm {
    pub store_name: String,
    pub tagline: String,
    pub footer_text: String,
    pub header_bg: String,
    pub header_text: String,
    pub card_bg: String,
    pub card_text: String,
    pub accent: String,
    pub background: String,
    pub font: String,
    pub show_categories: Option<String>,
    pub checkout_card: Option<String>,
    pub checkout_vipps: Option<String>,
    pub checkout_simulated: Option<String>,
    pub checkout_invoice: Option<String>,
}

pub type SettingChange = (&'static str, Option<String>);

impl SettingsForm {
    pub fn validate(self) -> Result<Vec<SettingChange>, AppError> {
        let texts = [
            (STORE_NAME, self.store_name),
            (TAGLINE, self.tagline),
            (FOOTER_TEXT, self.footer_text),
            (HEADER_BG, self.header_bg),
            (HEADER_TEXT, self.header_text),
            (CARD_BG, self.card_bg),
            (CARD_TEXT, self.card_text),
            (ACCENT, self.accent),
            (BACKGROUND, self.background),
            (FONT, self.font),
        ];

        let mut changes = Vec::with_capacity(DEFAULTS.len());
        for (key, value) in texts {
            let value = value.trim();
            if value.chars().count() > MAX_VALUE_LEN {
                return Err(AppError::Validation(format!(
                    "`{key}` is longer than {MAX_VALUE_LEN} characters"
                )));
            }
            if THEME_KEYS.contains(&key) && value.contains(CSS_FORBIDDEN) {
                return Err(AppError::Validation(format!(
                    "`{key}` contains characters that are not allowed; quote font names with '"
                )));
            }
            if value.contains(['<', '>', '{', '}', ';']) && key != FOOTER_TEXT && key != TAGLINE {
                return Err(AppError::Validation(format!(
                    "`{key}` contains characters that are not allowed"
                )));
            }
            let value = (!value.is_empty()).then(|| value.to_string());
            changes.push((key, value));
        }

        let flags = [
            (SHOW_CATEGORIES, self.show_categories),
            (CHECKOUT_CARD, self.checkout_card),
            (CHECKOUT_VIPPS, self.checkout_vipps),
            (CHECKOUT_SIMULATED, self.checkout_simulated),
            (CHECKOUT_INVOICE, self.checkout_invoice),
        ];
        for (key, value) in flags {
            changes.push((key, Some(flag_value(value.is_some()))));
        }

        Ok(changes)
    }
}
