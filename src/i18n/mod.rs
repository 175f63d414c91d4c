//! Translations
//!
//! Each supported market/language pair has a static [`Translation`] table. The
//! tables are plain Rust values, so a key missing from one locale is a compile
//! error rather than a runtime fallback.

use crate::{
    catalog::Condition,
    locale::{Language, LocaleState, Market},
};

mod ar;
mod en;

macro_rules! strings {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            $(
                #[doc = concat!("`", stringify!($field), "`")]
                pub $field: &'static str,
            )+
        }

        impl $name {
            /// Field names and values, in declaration order.
            pub fn entries(&self) -> Vec<(&'static str, &'static str)> {
                vec![$((stringify!($field), self.$field)),+]
            }
        }
    };
}

strings! {
    /// Strings shared across the whole page.
    CommonStrings {
        app_title,
        market_name,
        currency_name,
        switch_language,
        back,
        close,
        cancel,
        confirm,
        loading,
    }
}

strings! {
    /// Category browsing, search and condition selection.
    CatalogStrings {
        all_categories,
        search_placeholder,
        no_results,
        select_condition,
        condition_like_new,
        condition_very_good,
        condition_well_used,
        price,
        member_price,
        add_to_list,
    }
}

strings! {
    /// The buyback list and the submission form.
    BuybackStrings {
        list_title,
        article_number_column,
        product_column,
        condition_column,
        empty_list,
        item_count,
        quantity,
        total_value,
        family_total_value,
        remove_item,
        clear_list,
        email_label,
        store_label,
        consent_label,
        submit,
        submitting,
        confirmation_title,
        confirmation_number,
    }
}

strings! {
    /// Request failure messages.
    ErrorStrings {
        network,
        bad_request,
        unauthorized,
        forbidden,
        not_found,
        server,
        unavailable,
        submission_rejected,
        generic,
    }
}

strings! {
    /// Form and data validation messages.
    ValidationStrings {
        empty_list,
        invalid_email,
        store_required,
        consent_required,
        condition_unavailable,
    }
}

strings! {
    /// Toast and modal copy.
    NotificationStrings {
        item_added,
        item_removed,
        list_cleared,
        submission_success,
        clear_list_title,
        clear_list_message,
        ok,
        cancel,
    }
}

/// A complete string table for one market/language pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    /// Shared strings
    pub common: CommonStrings,

    /// Catalog strings
    pub catalog: CatalogStrings,

    /// Buyback list and submission strings
    pub buyback: BuybackStrings,

    /// Request failure messages
    pub errors: ErrorStrings,

    /// Validation messages
    pub validation: ValidationStrings,

    /// Toast and modal strings
    pub notifications: NotificationStrings,
}

impl Translation {
    /// Every `section.key` and its value.
    pub fn entries(&self) -> Vec<(String, &'static str)> {
        let sections = [
            ("common", self.common.entries()),
            ("catalog", self.catalog.entries()),
            ("buyback", self.buyback.entries()),
            ("errors", self.errors.entries()),
            ("validation", self.validation.entries()),
            ("notifications", self.notifications.entries()),
        ];

        sections
            .into_iter()
            .flat_map(|(section, entries)| {
                entries
                    .into_iter()
                    .map(move |(key, value)| (format!("{section}.{key}"), value))
            })
            .collect()
    }

    /// Look up a dotted key such as `notifications.clear_list_message`.
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        let (section, field) = key.split_once('.')?;

        let entries = match section {
            "common" => self.common.entries(),
            "catalog" => self.catalog.entries(),
            "buyback" => self.buyback.entries(),
            "errors" => self.errors.entries(),
            "validation" => self.validation.entries(),
            "notifications" => self.notifications.entries(),
            _ => return None,
        };

        entries
            .into_iter()
            .find_map(|(name, value)| (name == field).then_some(value))
    }

    /// Display label for a condition grade.
    pub fn condition(&self, condition: Condition) -> &'static str {
        match condition {
            Condition::LikeNew => self.catalog.condition_like_new,
            Condition::VeryGood => self.catalog.condition_very_good,
            Condition::WellUsed => self.catalog.condition_well_used,
        }
    }
}

/// Replace `{name}` placeholders in a template.
pub fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}

/// The table for a market/language pair.
pub fn translation(market: Market, language: Language) -> &'static Translation {
    match (market, language) {
        (Market::Sa, Language::En) => &en::EN_SA,
        (Market::Bh, Language::En) => &en::EN_BH,
        (Market::Sa, Language::Ar) => &ar::AR_SA,
        (Market::Bh, Language::Ar) => &ar::AR_BH,
    }
}

/// The table for a resolved locale.
pub fn translation_for(locale: &LocaleState) -> &'static Translation {
    translation(locale.market(), locale.language())
}

/// The table for a `{language}-{market}` key; unknown keys get the en-sa table.
pub fn translation_for_key(key: &str) -> &'static Translation {
    key.split_once('-')
        .and_then(|(language, market)| Some((Market::parse(market)?, Language::parse(language)?)))
        .map_or(&en::EN_SA, |(market, language)| translation(market, language))
}
