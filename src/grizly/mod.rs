//! grizly.cz storefront: HTTP client, page parsing, and ordering.

pub mod client;
pub mod models;
pub mod order;
pub mod parser;
pub mod selectors;

pub use client::{GrizlyClient, Storefront};
pub use models::{CartResponse, Product};
pub use order::{resolve, submit};
pub use parser::{CatalogPage, HtmlCatalogPage};
