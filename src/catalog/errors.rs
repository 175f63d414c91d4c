//! Catalog errors.

use std::io;

use thiserror::Error;

use crate::catalog::Condition;

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("failed to read catalog: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two categories share an id
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),

    /// A category names a parent that does not exist
    #[error("category {category} has unknown parent {parent}")]
    UnknownParent {
        /// Category id
        category: String,
        /// Missing parent id
        parent: String,
    },

    /// Parent references loop back on themselves
    #[error("category hierarchy contains a cycle through {0}")]
    CategoryCycle(String),

    /// A category's level is not its parent's level plus one
    #[error("category {category} has level {found}, expected {expected}")]
    InvalidLevel {
        /// Category id
        category: String,
        /// Level implied by the parent chain
        expected: u8,
        /// Level declared in the fixture
        found: u8,
    },

    /// Two products share an id
    #[error("duplicate product: {0}")]
    DuplicateProduct(String),

    /// A product is assigned to a category that does not exist
    #[error("product {product} has unknown category {category}")]
    UnknownCategory {
        /// Product id
        product: String,
        /// Missing category id
        category: String,
    },

    /// A product offers no condition grades
    #[error("product {0} has no condition prices")]
    NoConditions(String),

    /// A product lists the same grade twice
    #[error("product {product} lists condition {condition} more than once")]
    DuplicateCondition {
        /// Product id
        product: String,
        /// Repeated grade
        condition: Condition,
    },

    /// A price or member price is negative
    #[error("product {product} has a negative price for {condition}")]
    NegativePrice {
        /// Product id
        product: String,
        /// Grade with the bad price
        condition: Condition,
    },
}
