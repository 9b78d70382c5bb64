//! CSS selectors and text patterns for grizly.cz product pages.
//!
//! Update this file when the shop changes its HTML structure, and add a
//! fixture test in `parser.rs` for the new markup.

use regex_lite::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// Attribute on the purchase input carrying the catalog product id.
pub static PRODUCT_ID_ATTR: &str = "data-pid";

/// Purchase form input. Absent when the product cannot be added to a cart.
pub static PURCHASE_INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#product_detail_content form input").unwrap());

/// Currently selected package variant label.
pub static ACTIVE_PACKAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#product_detail_content a.js-package_item.active > span").unwrap()
});

/// Primary (current) price display.
pub static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#product_detail_content div.primary").unwrap());

/// Product title.
pub static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#product_detail_content h1").unwrap());

/// Package weight, e.g. `500 g`.
pub static WEIGHT_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\s+g").unwrap());

/// Price in whole crowns, e.g. `150 Kč` or `1,299 Kč`. Commas only
/// separate thousands groups.
pub static PRICE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,3}(?:,\d{3})+|\d+)\s*Kč").unwrap());
