//! Buyback list rendering

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::{
    buyback::{BuybackError, BuybackListStore, BuybackSummary},
    i18n::{Translation, interpolate},
    locale::LocaleState,
};

impl BuybackListStore {
    /// Write the list and its totals as a table, in the locale's language and currency.
    ///
    /// # Errors
    ///
    /// Returns a `BuybackError::Io` if the output cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        locale: &LocaleState,
        translation: &Translation,
    ) -> Result<(), BuybackError> {
        let items = self.items();

        if items.is_empty() {
            writeln!(out, "{}", translation.buyback.empty_list)?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record([
            translation.buyback.product_column,
            translation.buyback.article_number_column,
            translation.buyback.condition_column,
            translation.buyback.quantity,
            translation.catalog.price,
            translation.catalog.member_price,
        ]);

        for item in &items {
            builder.push_record([
                item.product.name.clone(),
                item.product.catalog_number.clone(),
                translation.condition(item.condition).to_string(),
                item.quantity.to_string(),
                locale.format_currency(item.line_total()),
                locale.format_currency(item.line_family_total()),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Alignment::center());
        table.modify(Columns::new(3..), Alignment::right());

        writeln!(out, "{table}")?;

        write_summary(&mut out, &BuybackSummary::of(&items), locale, translation)?;

        Ok(())
    }
}

fn write_summary(
    out: &mut impl io::Write,
    summary: &BuybackSummary,
    locale: &LocaleState,
    translation: &Translation,
) -> io::Result<()> {
    let count = summary.item_count.to_string();

    writeln!(
        out,
        "{}",
        interpolate(translation.buyback.item_count, &[("count", &count)])
    )?;
    writeln!(
        out,
        "{}: {}",
        translation.buyback.total_value,
        locale.format_currency(summary.total_value)
    )?;
    writeln!(
        out,
        "{}: {}",
        translation.buyback.family_total_value,
        locale.format_currency(summary.total_family_value)
    )
}
