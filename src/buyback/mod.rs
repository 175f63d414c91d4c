//! Buyback list
//!
//! The shopper's selected items. The store is the only writer of the list; every
//! mutation publishes the new list to subscribers and writes a full snapshot to
//! durable storage before returning.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    catalog::{Condition, Product},
    signal::Signal,
    storage::{PersistentStore, StorageScope},
};

mod errors;
mod models;
mod table;

pub use errors::BuybackError;
pub use models::{BuybackItem, BuybackSummary};

/// Durable storage key holding the serialized list.
pub const BUYBACK_LIST_KEY: &str = "buyback_list";

/// Buyback list store.
#[derive(Debug)]
pub struct BuybackListStore {
    items: Signal<Vec<BuybackItem>>,
    storage: PersistentStore,
}

impl BuybackListStore {
    /// Create the store, restoring the last persisted list.
    ///
    /// A missing or unreadable snapshot yields an empty list.
    pub fn new(storage: PersistentStore) -> Self {
        let items = storage
            .get::<Vec<BuybackItem>>(StorageScope::Durable, BUYBACK_LIST_KEY)
            .map(normalize)
            .unwrap_or_default();

        if !items.is_empty() {
            info!(items = items.len(), "restored buyback list");
        }

        Self {
            items: Signal::new(items),
            storage,
        }
    }

    /// Add one unit of `product` at `condition`.
    ///
    /// A repeat selection of the same product and condition increments the
    /// existing item's quantity. Returns the resulting item.
    ///
    /// # Errors
    ///
    /// Returns `BuybackError::ConditionUnavailable` if the product does not offer
    /// `condition`; the list is left unchanged.
    pub fn add_item(
        &self,
        product: &Product,
        condition: Condition,
    ) -> Result<BuybackItem, BuybackError> {
        let Some(entry) = product.condition_price(condition) else {
            warn!(product_id = %product.id, %condition, "condition not offered for product");

            return Err(BuybackError::ConditionUnavailable {
                product_id: product.id.clone(),
                condition,
            });
        };

        let item = self.items.modify(|items| {
            if let Some(existing) = items
                .iter_mut()
                .find(|item| item.is_for(&product.id, condition))
            {
                existing.quantity = existing.quantity.saturating_add(1);
                existing.clone()
            } else {
                let item = BuybackItem::new(product, entry);
                items.push(item.clone());
                item
            }
        });

        debug!(
            product_id = %product.id,
            %condition,
            quantity = item.quantity,
            "added buyback item"
        );

        self.persist();

        Ok(item)
    }

    /// Set an item's quantity. A quantity below 1 removes the item.
    ///
    /// # Errors
    ///
    /// Returns `BuybackError::ItemNotFound` if no item has this id.
    pub fn update_quantity(&self, id: Uuid, quantity: u32) -> Result<(), BuybackError> {
        if quantity < 1 {
            return self
                .remove_item(id)
                .map(|_removed| ())
                .ok_or(BuybackError::ItemNotFound(id));
        }

        self.ensure_exists(id)?;

        self.items.modify(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.id == id) {
                item.quantity = quantity;
            }
        });

        debug!(%id, quantity, "updated buyback item quantity");

        self.persist();

        Ok(())
    }

    /// Add one to an item's quantity.
    ///
    /// # Errors
    ///
    /// Returns `BuybackError::ItemNotFound` if no item has this id.
    pub fn increment(&self, id: Uuid) -> Result<(), BuybackError> {
        let quantity = self.quantity_of(id)?;

        self.update_quantity(id, quantity.saturating_add(1))
    }

    /// Subtract one from an item's quantity, removing it when it would reach zero.
    ///
    /// # Errors
    ///
    /// Returns `BuybackError::ItemNotFound` if no item has this id.
    pub fn decrement(&self, id: Uuid) -> Result<(), BuybackError> {
        let quantity = self.quantity_of(id)?;

        self.update_quantity(id, quantity.saturating_sub(1))
    }

    /// Drop an item, returning it if it was present.
    pub fn remove_item(&self, id: Uuid) -> Option<BuybackItem> {
        if self.get_by_id(id).is_none() {
            return None;
        }

        let removed = self.items.modify(|items| {
            let position = items.iter().position(|item| item.id == id)?;
            Some(items.remove(position))
        });

        debug!(%id, "removed buyback item");

        self.persist();

        removed
    }

    /// Change an item's condition, re-snapshotting its prices from the product.
    ///
    /// If another item already holds the product at the new condition, the two
    /// are merged into that item so each `(product, condition)` pair stays unique.
    ///
    /// # Errors
    ///
    /// Returns `BuybackError::ItemNotFound` for an unknown id and
    /// `BuybackError::ConditionUnavailable` if the product does not offer
    /// `condition`. The list is unchanged in both cases.
    pub fn update_condition(&self, id: Uuid, condition: Condition) -> Result<(), BuybackError> {
        let item = self.get_by_id(id).ok_or(BuybackError::ItemNotFound(id))?;

        let Some(entry) = item.product.condition_price(condition).cloned() else {
            warn!(product_id = %item.product.id, %condition, "condition not offered for product");

            return Err(BuybackError::ConditionUnavailable {
                product_id: item.product.id,
                condition,
            });
        };

        self.items.modify(|items| {
            let duplicate = items
                .iter()
                .position(|other| other.id != id && other.is_for(&item.product.id, condition));

            match duplicate {
                Some(position) => {
                    if let Some(target) = items.get_mut(position) {
                        target.quantity = target.quantity.saturating_add(item.quantity);
                        target.price = entry.price;
                        target.member_price = entry.member_price;
                    }

                    items.retain(|other| other.id != id);
                }
                None => {
                    if let Some(target) = items.iter_mut().find(|other| other.id == id) {
                        target.condition = condition;
                        target.price = entry.price;
                        target.member_price = entry.member_price;
                    }
                }
            }
        });

        debug!(%id, %condition, "updated buyback item condition");

        self.persist();

        Ok(())
    }

    /// Empty the list.
    pub fn clear_list(&self) {
        self.items.set(Vec::new());

        debug!("cleared buyback list");

        self.persist();
    }

    /// Current items, in insertion order.
    pub fn items(&self) -> Vec<BuybackItem> {
        self.items.get()
    }

    /// Totals for the current list.
    pub fn summary(&self) -> BuybackSummary {
        self.items.with(|items| BuybackSummary::of(items))
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u32 {
        self.summary().item_count
    }

    /// Number of distinct items.
    pub fn line_count(&self) -> usize {
        self.items.with(Vec::len)
    }

    /// Sum of `price × quantity`.
    pub fn total_value(&self) -> Decimal {
        self.summary().total_value
    }

    /// Sum of `member_price × quantity`.
    pub fn total_family_value(&self) -> Decimal {
        self.summary().total_family_value
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.with(Vec::is_empty)
    }

    /// Whether the product is in the list, at `condition` or at any condition.
    pub fn has_item(&self, product_id: &str, condition: Option<Condition>) -> bool {
        self.items.with(|items| {
            items.iter().any(|item| {
                item.product.id == product_id && condition.is_none_or(|c| item.condition == c)
            })
        })
    }

    /// The item for `(product_id, condition)`.
    pub fn get_item(&self, product_id: &str, condition: Condition) -> Option<BuybackItem> {
        self.items.with(|items| {
            items
                .iter()
                .find(|item| item.is_for(product_id, condition))
                .cloned()
        })
    }

    /// The item with `id`.
    pub fn get_by_id(&self, id: Uuid) -> Option<BuybackItem> {
        self.items
            .with(|items| items.iter().find(|item| item.id == id).cloned())
    }

    /// Subscribe to list changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<BuybackItem>> {
        self.items.subscribe()
    }

    fn quantity_of(&self, id: Uuid) -> Result<u32, BuybackError> {
        self.get_by_id(id)
            .map(|item| item.quantity)
            .ok_or(BuybackError::ItemNotFound(id))
    }

    fn ensure_exists(&self, id: Uuid) -> Result<(), BuybackError> {
        self.quantity_of(id).map(|_quantity| ())
    }

    fn persist(&self) {
        self.items
            .with(|items| self.storage.set(StorageScope::Durable, BUYBACK_LIST_KEY, items));
    }
}

/// Repair a restored snapshot: drop empty items and merge duplicate pairs.
fn normalize(items: Vec<BuybackItem>) -> Vec<BuybackItem> {
    let mut positions: FxHashMap<(String, Condition), usize> = FxHashMap::default();
    let mut normalized: Vec<BuybackItem> = Vec::with_capacity(items.len());

    for item in items.into_iter().filter(|item| item.quantity >= 1) {
        let key = (item.product.id.clone(), item.condition);

        if let Some(existing) = positions.get(&key).and_then(|&i| normalized.get_mut(i)) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            continue;
        }

        positions.insert(key, normalized.len());
        normalized.push(item);
    }

    normalized
}
