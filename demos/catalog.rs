//! Catalog Example
//!
//! Prints the category tree and the products matching a filter, priced in the
//! currency of the market resolved from the path.
//!
//! Use `-c` to filter by category and `-q` to search.

use anyhow::Result;
use clap::Parser;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use buyback::{
    catalog::{CatalogStore, Category, ProductFilter},
    config::AppConfig,
    i18n::translation_for,
    locale::{LocaleResolver, LocaleState},
};

/// Catalog example arguments
#[derive(Debug, Parser)]
struct CatalogArgs {
    /// Request path, `/{market}/{language}/...`
    #[arg(default_value = "/sa/en/catalog")]
    path: String,

    /// Category id
    #[arg(short, long)]
    category: Option<String>,

    /// Search query
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Portal configuration
    #[command(flatten)]
    config: AppConfig,
}

/// Catalog Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = CatalogArgs::parse();

    let locale = LocaleResolver::new(args.config.default_market, args.config.default_language)
        .resolve(&args.path);

    let catalog = match &args.config.catalog {
        Some(path) => CatalogStore::from_path(path)?,
        None => CatalogStore::bundled()?,
    };

    for category in catalog.top_level() {
        print_tree(&catalog, category);
    }

    catalog.set_filter(ProductFilter {
        category_id: args.category,
        search_query: args.search,
    });

    println!("\n{}", products_table(&catalog, &locale));

    Ok(())
}

#[expect(clippy::print_stdout, reason = "Example code")]
fn print_tree(catalog: &CatalogStore, category: &Category) {
    let indent = "  ".repeat(usize::from(category.level.saturating_sub(1)));

    println!(
        "{indent}{} ({}) [{}]",
        category.name, category.id, category.product_count
    );

    for child in catalog.children_of(&category.id) {
        print_tree(catalog, child);
    }
}

fn products_table(catalog: &CatalogStore, locale: &LocaleState) -> String {
    let translation = translation_for(locale);
    let products = catalog.visible_products();

    if products.is_empty() {
        return translation.catalog.no_results.to_string();
    }

    let mut builder = Builder::default();

    builder.push_record([
        "#",
        "",
        translation.catalog.select_condition,
        translation.catalog.price,
        translation.catalog.member_price,
    ]);

    for product in products {
        for offer in &product.conditions {
            builder.push_record([
                product.catalog_number.clone(),
                product.name.clone(),
                translation.condition(offer.condition).to_string(),
                locale.format_currency(offer.price),
                locale.format_currency(offer.member_price),
            ]);
        }
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..), Alignment::right());

    table.to_string()
}
