use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::Product;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<i32, u32>,
}

impl Cart {
    /// Adds `quantity` (at least 1) to the line for `product_id` and returns the new quantity.
    pub fn add(&mut self, product_id: i32, quantity: u32) -> u32 {
        let entry = self.items.entry(product_id).or_insert(0);
        *entry = entry.saturating_add(quantity.max(1));
        *entry
    }

    pub fn remove(&mut self, product_id: i32) -> bool {
        self.items.remove(&product_id).is_some()
    }

    pub fn quantity(&self, product_id: i32) -> Option<u32> {
        self.items.get(&product_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn product_ids(&self) -> Vec<i32> {
        self.items.keys().copied().collect()
    }

    pub fn item_count(&self) -> u64 {
        self.items.values().map(|q| u64::from(*q)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
        self.items.iter().map(|(id, qty)| (*id, *qty))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub line_total: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: i64,
    pub item_count: u64,
}

impl CartSummary {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub fn summarize(cart: &Cart, products: Vec<Product>) -> CartSummary {
    let mut by_id: HashMap<i32, Product> = products.into_iter().map(|p| (p.id, p)).collect();

    let mut summary = CartSummary::default();
    for (product_id, quantity) in cart.iter() {
        let Some(product) = by_id.remove(&product_id) else {
            continue;
        };
        let line_total = product.price.saturating_mul(i64::from(quantity));
        summary.total = summary.total.saturating_add(line_total);
        summary.item_count += u64::from(quantity);
        summary.lines.push(CartLine {
            product,
            quantity,
            line_total,
        });
    }
    summary
}
