//! Catalog Fixtures
//!
//! The catalog is loaded once from YAML. Loading checks the data-model
//! invariants: categories form a forest with consistent levels, and every
//! product offers at least one distinct condition grade.

use petgraph::{algo::toposort, graphmap::DiGraphMap};
use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use crate::{
    catalog::{CatalogError, Category, Product, Store},
    locale::Market,
};

/// Wrapper for the catalog YAML document
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Category definitions
    pub categories: Vec<CategoryFixture>,

    /// Products
    pub products: Vec<Product>,

    /// Store locations per market
    #[serde(default)]
    pub stores: FxHashMap<Market, Vec<Store>>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFixture {
    /// Category id
    pub id: String,

    /// Display name
    pub name: String,

    /// Parent category id
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Declared depth
    pub level: u8,
}

/// Validated catalog contents.
#[derive(Debug, Default)]
pub(crate) struct CatalogData {
    pub(crate) categories: Vec<Category>,
    pub(crate) products: Vec<Product>,
    pub(crate) stores: FxHashMap<Market, Vec<Store>>,
}

impl CatalogFixture {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the YAML does not match the fixture shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    pub(crate) fn validate(self) -> Result<CatalogData, CatalogError> {
        validate_products(&self.products, &self.categories)?;

        let levels = category_levels(&self.categories)?;

        let mut counts: FxHashMap<&str, u32> = FxHashMap::default();
        for product in &self.products {
            *counts.entry(product.category_id.as_str()).or_default() += 1;
        }

        let categories = self
            .categories
            .iter()
            .map(|fixture| {
                let expected = levels.get(fixture.id.as_str()).copied().unwrap_or(1);

                if fixture.level != expected {
                    return Err(CatalogError::InvalidLevel {
                        category: fixture.id.clone(),
                        expected,
                        found: fixture.level,
                    });
                }

                Ok(Category {
                    id: fixture.id.clone(),
                    name: fixture.name.clone(),
                    parent_id: fixture.parent_id.clone(),
                    level: fixture.level,
                    product_count: counts.get(fixture.id.as_str()).copied().unwrap_or(0),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CatalogData {
            categories,
            products: self.products,
            stores: self.stores,
        })
    }
}

/// Compute the level implied by each category's parent chain.
fn category_levels(categories: &[CategoryFixture]) -> Result<FxHashMap<&str, u8>, CatalogError> {
    let mut graph = DiGraphMap::<&str, ()>::new();

    for category in categories {
        if graph.contains_node(category.id.as_str()) {
            return Err(CatalogError::DuplicateCategory(category.id.clone()));
        }

        graph.add_node(category.id.as_str());
    }

    for category in categories {
        if let Some(parent) = category.parent_id.as_deref() {
            if !graph.contains_node(parent) {
                return Err(CatalogError::UnknownParent {
                    category: category.id.clone(),
                    parent: parent.to_string(),
                });
            }

            graph.add_edge(parent, category.id.as_str(), ());
        }
    }

    let order = toposort(&graph, None)
        .map_err(|cycle| CatalogError::CategoryCycle(cycle.node_id().to_string()))?;

    let parents: FxHashMap<&str, &str> = categories
        .iter()
        .filter_map(|category| Some((category.id.as_str(), category.parent_id.as_deref()?)))
        .collect();

    let mut levels: FxHashMap<&str, u8> = FxHashMap::default();

    for id in order {
        let level = parents
            .get(id)
            .and_then(|parent| levels.get(parent))
            .map_or(1, |parent_level| parent_level.saturating_add(1));

        levels.insert(id, level);
    }

    Ok(levels)
}

fn validate_products(
    products: &[Product],
    categories: &[CategoryFixture],
) -> Result<(), CatalogError> {
    let category_ids: FxHashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    let mut product_ids: FxHashSet<&str> = FxHashSet::default();

    for product in products {
        if !product_ids.insert(product.id.as_str()) {
            return Err(CatalogError::DuplicateProduct(product.id.clone()));
        }

        if !category_ids.contains(product.category_id.as_str()) {
            return Err(CatalogError::UnknownCategory {
                product: product.id.clone(),
                category: product.category_id.clone(),
            });
        }

        if product.conditions.is_empty() {
            return Err(CatalogError::NoConditions(product.id.clone()));
        }

        let mut seen = FxHashSet::default();

        for entry in &product.conditions {
            if !seen.insert(entry.condition) {
                return Err(CatalogError::DuplicateCondition {
                    product: product.id.clone(),
                    condition: entry.condition,
                });
            }

            if entry.price < Decimal::ZERO || entry.member_price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    product: product.id.clone(),
                    condition: entry.condition,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const CATEGORIES: &str = r#"
categories:
  - { id: furniture, name: Furniture, level: 1 }
  - { id: chairs, name: Chairs, parentId: furniture, level: 2 }
  - { id: office-chairs, name: Office chairs, parentId: chairs, level: 3 }
"#;

    fn with_products(products: &str) -> String {
        format!("{CATEGORIES}products:\n{products}")
    }

    #[test]
    fn computes_product_counts_and_keeps_levels() -> TestResult {
        let yaml = with_products(
            r#"
  - id: "1"
    catalogNumber: "001.001.01"
    name: ADDE
    categoryId: chairs
    conditions:
      - { condition: LIKE_NEW, price: "10.00", memberPrice: "11.00" }
  - id: "2"
    catalogNumber: "001.001.02"
    name: MARKUS
    categoryId: office-chairs
    conditions:
      - { condition: VERY_GOOD, price: "150.00", memberPrice: "165.00" }
"#,
        );

        let data = CatalogFixture::from_yaml(&yaml)?.validate()?;

        let counts: Vec<(&str, u8, u32)> = data
            .categories
            .iter()
            .map(|c| (c.id.as_str(), c.level, c.product_count))
            .collect();

        assert_eq!(
            counts,
            [("furniture", 1, 0), ("chairs", 2, 1), ("office-chairs", 3, 1)]
        );

        Ok(())
    }

    #[test]
    fn rejects_wrong_level() -> TestResult {
        let yaml = r"
categories:
  - { id: furniture, name: Furniture, level: 1 }
  - { id: chairs, name: Chairs, parentId: furniture, level: 3 }
products: []
";

        let result = CatalogFixture::from_yaml(yaml)?.validate();

        assert!(
            matches!(
                result,
                Err(CatalogError::InvalidLevel {
                    ref category,
                    expected: 2,
                    found: 3,
                }) if category == "chairs"
            ),
            "expected InvalidLevel, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn rejects_cycles() -> TestResult {
        let yaml = r"
categories:
  - { id: a, name: A, parentId: b, level: 2 }
  - { id: b, name: B, parentId: a, level: 2 }
products: []
";

        let result = CatalogFixture::from_yaml(yaml)?.validate();

        assert!(
            matches!(result, Err(CatalogError::CategoryCycle(_))),
            "expected CategoryCycle, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_parent() -> TestResult {
        let yaml = r"
categories:
  - { id: chairs, name: Chairs, parentId: furniture, level: 2 }
products: []
";

        let result = CatalogFixture::from_yaml(yaml)?.validate();

        assert!(
            matches!(result, Err(CatalogError::UnknownParent { .. })),
            "expected UnknownParent, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn rejects_product_without_conditions() -> TestResult {
        let yaml = with_products(
            r#"
  - id: "1"
    catalogNumber: "001.001.01"
    name: ADDE
    categoryId: chairs
    conditions: []
"#,
        );

        let result = CatalogFixture::from_yaml(&yaml)?.validate();

        assert!(
            matches!(result, Err(CatalogError::NoConditions(ref id)) if id == "1"),
            "expected NoConditions, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn rejects_duplicate_condition() -> TestResult {
        let yaml = with_products(
            r#"
  - id: "1"
    catalogNumber: "001.001.01"
    name: ADDE
    categoryId: chairs
    conditions:
      - { condition: LIKE_NEW, price: "10.00", memberPrice: "11.00" }
      - { condition: LIKE_NEW, price: "9.00", memberPrice: "10.00" }
"#,
        );

        let result = CatalogFixture::from_yaml(&yaml)?.validate();

        assert!(
            matches!(
                result,
                Err(CatalogError::DuplicateCondition {
                    condition: crate::catalog::Condition::LikeNew,
                    ..
                })
            ),
            "expected DuplicateCondition, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_category() -> TestResult {
        let yaml = with_products(
            r#"
  - id: "1"
    catalogNumber: "001.001.01"
    name: ADDE
    categoryId: sofas
    conditions:
      - { condition: LIKE_NEW, price: "10.00", memberPrice: "11.00" }
"#,
        );

        let result = CatalogFixture::from_yaml(&yaml)?.validate();

        assert!(
            matches!(result, Err(CatalogError::UnknownCategory { .. })),
            "expected UnknownCategory, got {result:?}"
        );

        Ok(())
    }
}
