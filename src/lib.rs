//! Buyback
//!
//! Core of a localized, multi-market buyback portal: shoppers browse a catalog,
//! grade the condition of the items they want to hand back, collect them in a
//! list and submit it for a quotation. Markets are Saudi Arabia and Bahrain, in
//! English and Arabic, resolved from the request path.

pub mod app;
pub mod buyback;
pub mod catalog;
pub mod config;
pub mod http;
pub mod i18n;
pub mod locale;
pub mod notifications;
pub mod observability;
pub mod page;
pub mod prelude;
pub mod signal;
pub mod storage;
pub mod submission;
