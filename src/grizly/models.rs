//! Data models for catalog products and cart responses.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product as resolved from its catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Catalog product id (`data-pid`), only meaningful to grizly.cz
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price in CZK
    pub price: Decimal,
    /// Package weight in grams, 0 when unknown
    pub weight: u32,
    /// Page the product was resolved from
    pub url: String,
}

impl Product {
    /// Price truncated to whole crowns, as the cart reports it.
    pub fn whole_price(&self) -> Option<i64> {
        self.price.trunc().to_i64()
    }

    /// Price rendered with two fraction digits (`150.00`).
    pub fn price_display(&self) -> String {
        let mut price = self.price;
        price.rescale(2);
        price.to_string()
    }
}

/// A product with the quantity ordered in this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedItem {
    pub product: Product,
    pub quantity: u32,
}

/// Products ordered during a run, keyed by catalog product id.
///
/// Two rows resolving to the same product do not add up: the later row
/// replaces the earlier quantity.
#[derive(Debug, Clone, Default)]
pub struct OrderSummary {
    items: BTreeMap<String, OrderedItem>,
}

impl OrderSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an ordered product, returning the quantity it replaced.
    pub fn insert(&mut self, product: Product, quantity: u32) -> Option<u32> {
        self.items
            .insert(product.id.clone(), OrderedItem { product, quantity })
            .map(|previous| previous.quantity)
    }

    pub fn get(&self, product_id: &str) -> Option<&OrderedItem> {
        self.items.get(product_id)
    }

    pub fn quantity(&self, product_id: &str) -> Option<u32> {
        self.get(product_id).map(|item| item.quantity)
    }

    /// Items ordered by product id.
    pub fn items(&self) -> impl Iterator<Item = &OrderedItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of unit price times quantity.
    pub fn total_price(&self) -> Decimal {
        self.items().map(|i| i.product.price * Decimal::from(i.quantity)).sum()
    }

    /// Sum of package weight times quantity, in grams.
    pub fn total_weight(&self) -> u64 {
        self.items().map(|i| u64::from(i.product.weight) * u64::from(i.quantity)).sum()
    }
}

/// JSON returned by the cart endpoint after an add. `isok` is required:
/// a body without it is not a cart answer.
#[derive(Debug, Clone, Deserialize)]
pub struct CartResponse {
    pub isok: bool,
    #[serde(rename = "basketItem")]
    pub basket_item: Option<BasketItem>,
}

/// The cart line the store created or updated.
#[derive(Debug, Clone, Deserialize)]
pub struct BasketItem {
    #[serde(rename = "priceWithVat")]
    pub price_with_vat: i64,
    pub quantity: u32,
}
