//! Buyback configuration module

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{
    http::DEFAULT_FAKE_DELAY,
    locale::{Language, Market},
};

mod logging;

pub use logging::{LogFormat, LoggingConfig};

/// Buyback portal configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "buyback", about = "IKEA Buyback portal", long_about = None)]
pub struct AppConfig {
    /// Market used when the path has no valid market segment
    #[arg(long, env = "BUYBACK_DEFAULT_MARKET", value_enum, default_value_t = Market::Sa)]
    pub default_market: Market,

    /// Language used when the path has no valid language segment
    #[arg(long, env = "BUYBACK_DEFAULT_LANGUAGE", value_enum, default_value_t = Language::En)]
    pub default_language: Language,

    /// Directory for durable storage; in-memory storage when unset
    #[arg(long, env = "BUYBACK_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Backend base URL; the in-process fake backend is used when unset
    #[arg(long, env = "BUYBACK_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Fake backend response delay in milliseconds
    #[arg(long, env = "BUYBACK_FAKE_DELAY_MS", default_value_t = 1500)]
    pub fake_delay_ms: u64,

    /// Catalog YAML file; the bundled catalog is used when unset
    #[arg(long, env = "BUYBACK_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_market: Market::Sa,
            default_language: Language::En,
            storage_dir: None,
            api_base_url: None,
            fake_delay_ms: u64::try_from(DEFAULT_FAKE_DELAY.as_millis()).unwrap_or(1500),
            catalog: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Fake backend response delay.
    #[must_use]
    pub fn fake_delay(&self) -> Duration {
        Duration::from_millis(self.fake_delay_ms)
    }
}
