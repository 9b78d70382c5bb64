//! grizly-orders - place grizly.cz orders from a Google Sheets shopping list
//!
//! Each shopping-list row is resolved against its product page, added to the
//! cart, and its outcome written back into the worksheet.

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod grizly;
pub mod sheets;

pub use config::Config;
pub use error::OrderError;
pub use grizly::models::{OrderSummary, Product};
