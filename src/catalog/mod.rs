//! Catalog
//!
//! Holds the immutable product and category data for a session, plus the
//! shopper's current category/search selection.

use std::path::Path;

use rustc_hash::FxHashMap;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{locale::Market, signal::Signal};

mod errors;
mod fixture;
mod models;

pub use errors::CatalogError;
pub use fixture::{CatalogFixture, CategoryFixture};
pub use models::{Category, Condition, ConditionPrice, Product, ProductFilter, Store};

/// Catalog bundled with the crate.
pub const BUNDLED_CATALOG: &str = include_str!("../../fixtures/catalog.yaml");

/// Product and category store.
#[derive(Debug)]
pub struct CatalogStore {
    categories: Vec<Category>,
    products: Vec<Product>,
    stores: FxHashMap<Market, Vec<Store>>,
    filter: Signal<ProductFilter>,
}

impl CatalogStore {
    /// Load and validate a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the YAML is malformed or breaks a catalog invariant.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let data = CatalogFixture::from_yaml(yaml)?.validate()?;

        info!(
            categories = data.categories.len(),
            products = data.products.len(),
            "catalog loaded"
        );

        Ok(Self {
            categories: data.categories,
            products: data.products,
            stores: data.stores,
            filter: Signal::default(),
        })
    }

    /// Load and validate a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the bundled fixture is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml(BUNDLED_CATALOG)
    }

    /// All categories.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Top-level categories.
    pub fn top_level(&self) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|category| category.parent_id.is_none())
            .collect()
    }

    /// Direct children of `category_id`.
    pub fn children_of(&self, category_id: &str) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|category| category.parent_id.as_deref() == Some(category_id))
            .collect()
    }

    /// Category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// All products, unfiltered.
    pub fn all_products(&self) -> &[Product] {
        &self.products
    }

    /// Products matching `filter`.
    ///
    /// The category filter matches direct assignment only; products in child
    /// categories are not included. Both filters must match.
    pub fn products(&self, filter: &ProductFilter) -> Vec<&Product> {
        let needle = filter.normalized_query();

        self.products
            .iter()
            .filter(|product| filter.matches(product, needle.as_deref()))
            .collect()
    }

    /// Store locations for a market.
    pub fn stores(&self, market: Market) -> &[Store] {
        self.stores
            .get(&market)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Store by id within a market.
    pub fn store(&self, market: Market, id: &str) -> Option<&Store> {
        self.stores(market).iter().find(|store| store.id == id)
    }

    /// The current selection.
    pub fn filter(&self) -> ProductFilter {
        self.filter.get()
    }

    /// Replace the current selection.
    pub fn set_filter(&self, filter: ProductFilter) {
        debug!(?filter, "catalog filter changed");

        self.filter.set(filter);
    }

    /// Select a category, keeping the search query. `None` shows all categories.
    pub fn select_category(&self, category_id: Option<String>) {
        self.filter.update(|filter| filter.category_id = category_id);
    }

    /// Set the search query, keeping the category.
    pub fn search(&self, query: impl Into<String>) {
        let query = query.into();

        self.filter.update(|filter| filter.search_query = Some(query));
    }

    /// Products matching the current selection.
    pub fn visible_products(&self) -> Vec<&Product> {
        self.filter.with(|filter| self.products(filter))
    }

    /// Subscribe to selection changes.
    pub fn subscribe_filter(&self) -> watch::Receiver<ProductFilter> {
        self.filter.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|product| product.name.clone()).collect()
    }

    #[test]
    fn bundled_catalog_loads() -> TestResult {
        let catalog = CatalogStore::bundled()?;

        assert!(!catalog.categories().is_empty());
        assert!(!catalog.all_products().is_empty());
        assert!(!catalog.stores(Market::Sa).is_empty());
        assert!(!catalog.stores(Market::Bh).is_empty());

        Ok(())
    }

    #[test]
    fn empty_filter_returns_everything() -> TestResult {
        let catalog = CatalogStore::bundled()?;

        assert_eq!(
            catalog.products(&ProductFilter::default()).len(),
            catalog.all_products().len()
        );

        Ok(())
    }

    #[test]
    fn category_filter_is_not_recursive() -> TestResult {
        let catalog = CatalogStore::bundled()?;

        let parent = catalog.products(&ProductFilter::category("decoration"));
        let child = catalog.products(&ProductFilter::category("plant-pots"));

        assert!(parent.is_empty(), "products live in child categories only");
        assert!(names(&child).contains(&"SATSUMAS".to_string()));
        assert!(child.iter().all(|product| product.category_id == "plant-pots"));

        Ok(())
    }

    #[test]
    fn search_is_case_insensitive_across_fields() -> TestResult {
        let catalog = CatalogStore::bundled()?;

        assert_eq!(names(&catalog.products(&ProductFilter::search("satsu"))), ["SATSUMAS"]);
        assert_eq!(
            names(&catalog.products(&ProductFilter::search("502.581"))),
            ["SATSUMAS"]
        );
        assert!(
            !catalog
                .products(&ProductFilter::search("PLANT STAND"))
                .is_empty(),
            "description should be searched"
        );

        Ok(())
    }

    #[test]
    fn filters_combine_with_and() -> TestResult {
        let catalog = CatalogStore::bundled()?;

        let filter = ProductFilter {
            category_id: Some("chairs".into()),
            search_query: Some("satsumas".into()),
        };

        assert!(catalog.products(&filter).is_empty());

        Ok(())
    }

    #[test]
    fn children_and_top_level() -> TestResult {
        let catalog = CatalogStore::bundled()?;

        let top: Vec<&str> = catalog.top_level().iter().map(|c| c.id.as_str()).collect();
        let children: Vec<&str> = catalog
            .children_of("decoration")
            .iter()
            .map(|c| c.id.as_str())
            .collect();

        assert!(top.contains(&"furniture"));
        assert!(top.contains(&"decoration"));
        assert!(children.contains(&"plant-pots"));
        assert!(catalog.children_of("plant-pots").is_empty());

        Ok(())
    }

    #[test]
    fn selection_drives_visible_products() -> TestResult {
        let catalog = CatalogStore::bundled()?;
        let receiver = catalog.subscribe_filter();

        catalog.select_category(Some("plant-pots".into()));
        catalog.search("vanilj");

        assert!(receiver.has_changed()?);
        assert_eq!(names(&catalog.visible_products()), ["VANILJSTÅNG"]);

        catalog.set_filter(ProductFilter::default());

        assert_eq!(catalog.visible_products().len(), catalog.all_products().len());

        Ok(())
    }

    #[test]
    fn stores_are_market_specific() -> TestResult {
        let catalog = CatalogStore::bundled()?;

        assert!(catalog.store(Market::Sa, "riyadh").is_some());
        assert!(catalog.store(Market::Bh, "riyadh").is_none());

        Ok(())
    }
}
