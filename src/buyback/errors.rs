//! Buyback list errors.

use std::io;

use thiserror::Error;
use uuid::Uuid;

use crate::catalog::Condition;

/// Errors reported by the buyback list. The list is unchanged when one is returned.
#[derive(Debug, Error)]
pub enum BuybackError {
    /// The product has no price for the requested grade.
    #[error("product {product_id} is not offered in condition {condition}")]
    ConditionUnavailable {
        /// Product id
        product_id: String,
        /// Requested grade
        condition: Condition,
    },

    /// No item with this id is in the list.
    #[error("buyback item {0} not found")]
    ItemNotFound(Uuid),

    /// Rendering the list failed.
    #[error("failed to write buyback list: {0}")]
    Io(#[from] io::Error),
}
