//! Product lookup command: resolve pages without ordering.

use crate::config::Config;
use crate::error::OrderError;
use crate::format::Formatter;
use crate::grizly::{resolve, GrizlyClient, Product, Storefront};
use anyhow::{Context, Result};
use tracing::warn;

/// Resolves product pages and prints what would be ordered.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves `urls` with a live client and returns formatted output.
    pub async fn execute(&self, session_cookie: &str, urls: &[String]) -> Result<String> {
        let client = GrizlyClient::new(&self.config, session_cookie)
            .context("Failed to create store client")?;

        let products = self.execute_with_client(&client, urls).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(if products.len() == 1 {
            formatter.format_product(&products[0])
        } else {
            formatter.format_products(&products)
        })
    }

    /// Resolves `urls` with a provided client (for testing). Unorderable
    /// pages are reported and left out.
    pub async fn execute_with_client(
        &self,
        client: &impl Storefront,
        urls: &[String],
    ) -> Result<Vec<Product>, OrderError> {
        let mut products = Vec::new();

        for url in urls {
            match resolve(client, url.trim()).await {
                Ok(product) => products.push(product),
                Err(e) if e.is_recoverable() => warn!("Out of stock ({}): {}", e, url),
                Err(e) => return Err(e),
            }
        }

        Ok(products)
    }
}
