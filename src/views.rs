use chrono::{DateTime, Utc};

use crate::{
    cart::{CartLine, CartSummary},
    dto::{
        products::{ProductForm, price_input_value},
        settings::StoreSettings,
    },
    models::{Category, ImageMeta, Order, PaymentMethod, Product, format_amount},
};

#[derive(Clone)]
pub struct Chrome {
    pub settings: StoreSettings,
    pub cart_count: u64,
    pub categories: Vec<Category>,
}

pub fn image_url(image_id: Option<i32>) -> Option<String> {
    image_id.map(|id| format!("/images/{id}"))
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub short_desc: String,
    pub long_desc: String,
    pub category_name: Option<String>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub in_stock: bool,
    pub active: bool,
}

impl ProductView {
    pub fn new(product: &Product, currency: &str) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: format_amount(product.price, currency),
            short_desc: product.short_desc.clone(),
            long_desc: product.long_desc.clone(),
            category_name: product.category_name.clone(),
            image_url: image_url(product.image_id),
            stock: product.stock,
            in_stock: product.stock > 0,
            active: product.active,
        }
    }
}

#[derive(Clone)]
pub struct CartLineView {
    pub product_id: i32,
    pub title: String,
    pub image_url: Option<String>,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl CartLineView {
    fn new(line: &CartLine, currency: &str) -> Self {
        Self {
            product_id: line.product.id,
            title: line.product.title.clone(),
            image_url: image_url(line.product.image_id),
            unit_price: format_amount(line.product.price, currency),
            quantity: line.quantity,
            line_total: format_amount(line.line_total, currency),
        }
    }
}

pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    pub fn new(summary: &CartSummary, currency: &str) -> Self {
        Self {
            lines: summary
                .lines
                .iter()
                .map(|line| CartLineView::new(line, currency))
                .collect(),
            total: format_amount(summary.total, currency),
            item_count: summary.item_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Clone)]
pub struct MethodOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn checkout_methods(settings: &StoreSettings, provider_supports: impl Fn(PaymentMethod) -> bool) -> Vec<MethodOption> {
    PaymentMethod::ALL
        .into_iter()
        .filter(|method| settings.method_enabled(*method))
        .filter(|method| !method.is_external() || provider_supports(*method))
        .map(|method| MethodOption {
            value: method.as_str(),
            label: method.label(),
        })
        .collect()
}

#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub email: String,
    pub amount: String,
    pub method: String,
    pub status: String,
    pub provider_ref: String,
    pub created_at: String,
    pub updated_at: String,
    pub completable: bool,
}

impl OrderView {
    pub fn new(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            email: order.email.clone(),
            amount: format_amount(order.amount, &order.currency),
            method: order.method.label().to_string(),
            status: order.status.as_str().to_string(),
            provider_ref: order.provider_ref.clone().unwrap_or_default(),
            created_at: format_date(order.created_at),
            updated_at: format_date(order.updated_at),
            completable: !order.status.is_terminal(),
        }
    }
}

#[derive(Clone)]
pub struct ImageView {
    pub id: i32,
    pub filename: String,
    pub url: String,
    pub uploaded_at: String,
}

impl From<&ImageMeta> for ImageView {
    fn from(image: &ImageMeta) -> Self {
        Self {
            id: image.id,
            filename: image.filename.clone(),
            url: format!("/images/{}", image.id),
            uploaded_at: format_date(image.created_at),
        }
    }
}

#[derive(Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn categories(categories: &[Category], selected: &str) -> Vec<Self> {
        categories
            .iter()
            .map(|c| {
                let value = c.id.to_string();
                Self {
                    selected: value == selected.trim(),
                    label: c.name.clone(),
                    value,
                }
            })
            .collect()
    }

    pub fn images(images: &[ImageMeta], selected: &str) -> Vec<Self> {
        images
            .iter()
            .map(|image| {
                let value = image.id.to_string();
                Self {
                    selected: value == selected.trim(),
                    label: format!("#{} {}", image.id, image.filename),
                    value,
                }
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct ProductFormValues {
    pub title: String,
    pub price: String,
    pub stock: String,
    pub short_desc: String,
    pub long_desc: String,
    pub category_id: String,
    pub image_id: String,
    pub active: bool,
}

impl ProductFormValues {
    pub fn blank() -> Self {
        Self {
            stock: "0".to_string(),
            active: true,
            ..Default::default()
        }
    }
}

impl From<&Product> for ProductFormValues {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: price_input_value(product.price),
            stock: product.stock.to_string(),
            short_desc: product.short_desc.clone(),
            long_desc: product.long_desc.clone(),
            category_id: product.category_id.map(|id| id.to_string()).unwrap_or_default(),
            image_id: product.image_id.map(|id| id.to_string()).unwrap_or_default(),
            active: product.active,
        }
    }
}

impl From<&ProductForm> for ProductFormValues {
    fn from(form: &ProductForm) -> Self {
        Self {
            title: form.title.clone(),
            price: form.price.clone(),
            stock: form.stock.clone(),
            short_desc: form.short_desc.clone(),
            long_desc: form.long_desc.clone(),
            category_id: form.category_id.clone(),
            image_id: form.image_id.clone(),
            active: form.active.is_some(),
        }
    }
}
