//! Buyback list models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Condition, ConditionPrice, Product};

/// A product the shopper intends to hand in, at a chosen condition.
///
/// Prices are a snapshot taken when the condition was chosen and are never
/// re-derived from the product afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuybackItem {
    /// Item id, generated per insertion
    pub id: Uuid,

    /// Product snapshot
    pub product: Product,

    /// Chosen condition grade
    pub condition: Condition,

    /// Price per unit at selection time
    pub price: Decimal,

    /// Member price per unit at selection time
    pub member_price: Decimal,

    /// Quantity, at least 1
    pub quantity: u32,

    /// When the item was first added
    pub added_at: Timestamp,
}

impl BuybackItem {
    pub(crate) fn new(product: &Product, entry: &ConditionPrice) -> Self {
        Self {
            id: Uuid::now_v7(),
            product: product.clone(),
            condition: entry.condition,
            price: entry.price,
            member_price: entry.member_price,
            quantity: 1,
            added_at: Timestamp::now(),
        }
    }

    /// Whether this item is the entry for `(product_id, condition)`.
    pub fn is_for(&self, product_id: &str, condition: Condition) -> bool {
        self.product.id == product_id && self.condition == condition
    }

    /// `price × quantity`
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// `member_price × quantity`
    pub fn line_family_total(&self) -> Decimal {
        self.member_price * Decimal::from(self.quantity)
    }
}

/// Totals derived from the current list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuybackSummary {
    /// Sum of quantities
    pub item_count: u32,

    /// Number of distinct items
    pub line_count: usize,

    /// Sum of `price × quantity`
    pub total_value: Decimal,

    /// Sum of `member_price × quantity`
    pub total_family_value: Decimal,
}

impl BuybackSummary {
    /// Compute the summary of `items`.
    pub fn of(items: &[BuybackItem]) -> Self {
        items.iter().fold(
            Self {
                line_count: items.len(),
                ..Self::default()
            },
            |summary, item| Self {
                item_count: summary.item_count.saturating_add(item.quantity),
                total_value: summary.total_value + item.line_total(),
                total_family_value: summary.total_family_value + item.line_family_total(),
                ..summary
            },
        )
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}
