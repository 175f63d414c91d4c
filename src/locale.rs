//! Locale resolution
//!
//! The portal is served under `/{market}/{language}/{route}`. The market and
//! language segments determine text direction and currency; nothing else may set
//! them independently.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};

/// Market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    /// Saudi Arabia
    Sa,

    /// Bahrain
    Bh,
}

impl Market {
    /// All supported markets.
    pub const ALL: [Market; 2] = [Market::Sa, Market::Bh];

    /// Parse a path segment, case-sensitively.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "sa" => Some(Self::Sa),
            "bh" => Some(Self::Bh),
            _ => None,
        }
    }

    /// Lowercase market code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Sa => "sa",
            Self::Bh => "bh",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    En,

    /// Arabic
    Ar,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    /// Parse a path segment, case-sensitively.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    /// Lowercase language code.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Text direction used by this language.
    pub fn direction(self) -> Direction {
        match self {
            Self::Ar => Direction::Rtl,
            Self::En => Direction::Ltr,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Text direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Left to right
    Ltr,

    /// Right to left
    Rtl,
}

impl Direction {
    /// Value for the document `dir` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Where the currency symbol sits relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `SAR 28.00`
    Before,

    /// `28.00 ر.س`
    After,
}

/// Currency presentation for a locale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyDescriptor {
    /// ISO currency
    pub currency: &'static Currency,

    /// Display symbol
    pub symbol: &'static str,

    /// Symbol placement
    pub position: SymbolPosition,
}

impl CurrencyDescriptor {
    /// Currency descriptor for a market/language pair.
    pub fn for_locale(market: Market, language: Language) -> Self {
        let (currency, symbol, position) = match (market, language) {
            (Market::Sa, Language::En) => (iso::SAR, "SAR", SymbolPosition::Before),
            (Market::Sa, Language::Ar) => (iso::SAR, "ر.س", SymbolPosition::After),
            (Market::Bh, Language::En) => (iso::BHD, "BHD", SymbolPosition::Before),
            (Market::Bh, Language::Ar) => (iso::BHD, "د.ب", SymbolPosition::After),
        };

        Self {
            currency,
            symbol,
            position,
        }
    }

    /// ISO 4217 code, e.g. `SAR`.
    pub fn code(&self) -> &'static str {
        self.currency.iso_alpha_code
    }

    /// Format `amount` with the currency's minor-unit precision and symbol.
    pub fn format(&self, amount: Decimal) -> String {
        let precision = self.currency.exponent as usize;
        let rounded = amount.round_dp(self.currency.exponent);
        let number = format!("{rounded:.precision$}");

        match self.position {
            SymbolPosition::Before => format!("{} {number}", self.symbol),
            SymbolPosition::After => format!("{number} {}", self.symbol),
        }
    }
}

/// Resolved locale. Direction and currency are derived from market and language.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocaleState {
    market: Market,
    language: Language,
    direction: Direction,
    currency: CurrencyDescriptor,
}

impl LocaleState {
    /// Build the locale for a market/language pair.
    pub fn new(market: Market, language: Language) -> Self {
        Self {
            market,
            language,
            direction: language.direction(),
            currency: CurrencyDescriptor::for_locale(market, language),
        }
    }

    /// Market
    pub fn market(&self) -> Market {
        self.market
    }

    /// Language
    pub fn language(&self) -> Language {
        self.language
    }

    /// Text direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Currency presentation
    pub fn currency(&self) -> &CurrencyDescriptor {
        &self.currency
    }

    /// Format an amount in this locale's currency.
    ///
    /// The amount is not converted; only symbol and precision change per market.
    pub fn format_currency(&self, amount: Decimal) -> String {
        self.currency.format(amount)
    }

    /// Translation lookup key, `{language}-{market}`.
    pub fn locale_key(&self) -> String {
        format!("{}-{}", self.language, self.market)
    }

    /// `Accept-Language` value, `{language}-{MARKET}`.
    pub fn accept_language(&self) -> String {
        format!("{}-{}", self.language, self.market.code().to_uppercase())
    }

    /// The `lang` and `dir` document attributes the caller should apply.
    pub fn html_attributes(&self) -> (&'static str, &'static str) {
        (self.language.code(), self.direction.as_str())
    }

    /// Path for `route` under this locale.
    ///
    /// Switching market or language is a navigation to a new path, never an
    /// in-place change of a running session's locale.
    pub fn path(&self, route: &str) -> String {
        format!("/{}/{}/{}", self.market, self.language, route.trim_matches('/'))
    }
}

/// Resolves locales from URL paths, falling back to configured defaults.
#[derive(Debug, Clone, Copy)]
pub struct LocaleResolver {
    default_market: Market,
    default_language: Language,
}

impl Default for LocaleResolver {
    fn default() -> Self {
        Self::new(Market::Sa, Language::En)
    }
}

impl LocaleResolver {
    /// Create a resolver with the given fallbacks.
    pub fn new(default_market: Market, default_language: Language) -> Self {
        Self {
            default_market,
            default_language,
        }
    }

    /// Resolve a path such as `/bh/ar/buyback`.
    ///
    /// The first two non-empty segments are read as market and language. Each
    /// falls back to its default on its own when missing or unsupported.
    pub fn resolve(&self, path: &str) -> LocaleState {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());

        let market = segments
            .next()
            .and_then(Market::parse)
            .unwrap_or(self.default_market);

        let language = segments
            .next()
            .and_then(Language::parse)
            .unwrap_or(self.default_language);

        LocaleState::new(market, language)
    }
}
