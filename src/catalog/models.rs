//! Catalog Models

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Condition grade a traded-in item is assessed at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    /// No visible signs of use
    LikeNew,

    /// Minor signs of use
    VeryGood,

    /// Clear signs of use, fully functional
    WellUsed,
}

impl Condition {
    /// All condition grades, best first.
    pub const ALL: [Condition; 3] = [Condition::LikeNew, Condition::VeryGood, Condition::WellUsed];

    /// Wire name, e.g. `LIKE_NEW`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LikeNew => "LIKE_NEW",
            Self::VeryGood => "VERY_GOOD",
            Self::WellUsed => "WELL_USED",
        }
    }

    /// Parse a wire name.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str() == value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price offered for a product at one condition grade.
///
/// Amounts carry no currency. They are shown as-is in the currency of
/// whichever market the shopper is in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionPrice {
    /// Condition grade
    pub condition: Condition,

    /// Standard buyback price
    pub price: Decimal,

    /// IKEA Family member price
    pub member_price: Decimal,

    /// What this grade means for this product
    #[serde(default)]
    pub description: String,
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id
    pub id: String,

    /// Article number, e.g. `502.581.56`
    pub catalog_number: String,

    /// Product name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Category the product is directly assigned to
    pub category_id: String,

    /// Image references
    #[serde(default)]
    pub images: Vec<String>,

    /// Offered condition grades, at least one
    pub conditions: Vec<ConditionPrice>,
}

impl Product {
    /// The price entry for `condition`, if the product offers it.
    pub fn condition_price(&self, condition: Condition) -> Option<&ConditionPrice> {
        self.conditions
            .iter()
            .find(|entry| entry.condition == condition)
    }

    /// Whether the product offers `condition`.
    pub fn offers(&self, condition: Condition) -> bool {
        self.condition_price(condition).is_some()
    }

    /// Case-insensitive substring match over name, description and article number.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_query(&self, needle: &str) -> bool {
        [&self.name, &self.description, &self.catalog_number]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category id
    pub id: String,

    /// Display name
    pub name: String,

    /// Parent category, `None` for top-level categories
    pub parent_id: Option<String>,

    /// Depth, 1 for top-level categories
    pub level: u8,

    /// Number of products directly assigned
    pub product_count: u32,
}

/// A store location where items are handed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Store id
    pub id: String,

    /// Display name
    pub name: String,

    /// City
    pub city: String,
}

/// Product filter. Empty fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact direct category match
    pub category_id: Option<String>,

    /// Case-insensitive substring over name, description and article number
    pub search_query: Option<String>,
}

impl ProductFilter {
    /// Filter by category only.
    pub fn category(id: impl Into<String>) -> Self {
        Self {
            category_id: Some(id.into()),
            search_query: None,
        }
    }

    /// Filter by search query only.
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            category_id: None,
            search_query: Some(query.into()),
        }
    }

    /// Whether the filter constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.normalized_query().is_none()
    }

    pub(crate) fn normalized_query(&self) -> Option<String> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }

    pub(crate) fn matches(&self, product: &Product, needle: Option<&str>) -> bool {
        let category_matches = self
            .category_id
            .as_deref()
            .is_none_or(|id| product.category_id == id);

        category_matches && needle.is_none_or(|needle| product.matches_query(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_wire_names() {
        assert_eq!(Condition::parse("VERY_GOOD"), Some(Condition::VeryGood));
        assert_eq!(Condition::parse("very_good"), None);
        assert_eq!(Condition::WellUsed.to_string(), "WELL_USED");
    }

    #[test]
    fn condition_serializes_as_wire_name() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&Condition::LikeNew)?, "\"LIKE_NEW\"");
        assert_eq!(
            serde_json::from_str::<Condition>("\"WELL_USED\"")?,
            Condition::WellUsed
        );

        Ok(())
    }

    #[test]
    fn whitespace_query_is_empty_filter() {
        let filter = ProductFilter::search("   ");

        assert!(filter.is_empty());
        assert_eq!(filter.normalized_query(), None);
    }
}
