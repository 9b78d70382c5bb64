//! HTML parser for grizly.cz product pages.

use crate::error::OrderError;
use crate::grizly::selectors;
use rust_decimal::Decimal;
use scraper::Html;
use std::str::FromStr;
use tracing::trace;

/// Field-level access to a product page.
///
/// `product_id` returns `Ok(None)` when the page offers no purchase control;
/// the other required fields fail with [`OrderError::Parse`] when missing.
pub trait CatalogPage {
    fn product_id(&self) -> Result<Option<String>, OrderError>;
    fn name(&self) -> Result<String, OrderError>;
    fn price(&self) -> Result<Decimal, OrderError>;
    fn weight(&self) -> u32;
}

/// A parsed product page document.
pub struct HtmlCatalogPage {
    document: Html,
}

impl HtmlCatalogPage {
    /// Parses raw HTML.
    pub fn parse(html: &str) -> Self {
        Self { document: Html::parse_document(html) }
    }

    fn first_text(&self, selector: &scraper::Selector) -> Option<String> {
        self.document.select(selector).next().map(|e| e.text().collect::<String>())
    }
}

impl CatalogPage for HtmlCatalogPage {
    fn product_id(&self) -> Result<Option<String>, OrderError> {
        let Some(input) = self.document.select(&selectors::PURCHASE_INPUT).next() else {
            return Ok(None);
        };

        input
            .value()
            .attr(selectors::PRODUCT_ID_ATTR)
            .map(|id| Some(id.to_string()))
            .ok_or_else(|| OrderError::parse("purchase input has no data-pid attribute"))
    }

    fn name(&self) -> Result<String, OrderError> {
        self.first_text(&selectors::TITLE)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| OrderError::parse("could not find product title"))
    }

    fn price(&self) -> Result<Decimal, OrderError> {
        let text = self
            .first_text(&selectors::PRICE)
            .ok_or_else(|| OrderError::parse("could not find product price"))?;

        parse_price(&text)
    }

    fn weight(&self) -> u32 {
        let Some(text) = self.first_text(&selectors::ACTIVE_PACKAGE) else {
            trace!("No active package on page");
            return 0;
        };

        parse_weight(&text).unwrap_or(0)
    }
}

/// Parses `1,299 Kč` style text into an exact amount. The comma is a
/// thousands separator.
pub fn parse_price(text: &str) -> Result<Decimal, OrderError> {
    // regex-lite's \s is ASCII only
    let text = text.replace('\u{a0}', " ");
    let caps = selectors::PRICE_TEXT
        .captures(&text)
        .ok_or_else(|| OrderError::parse(format!("unrecognized price text: {:?}", text.trim())))?;

    let digits = caps[1].replace(',', "");
    Decimal::from_str(&digits).map_err(|e| OrderError::parse(format!("invalid price {}: {}", digits, e)))
}

/// Parses `500 g` style text into grams.
pub fn parse_weight(text: &str) -> Option<u32> {
    let text = text.replace('\u{a0}', " ");
    let caps = selectors::WEIGHT_TEXT.captures(text.trim())?;
    caps[1].parse().ok()
}
