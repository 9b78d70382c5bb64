//! HTTP client for grizly.cz product pages and the cart endpoint.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use wreq::Client;
use wreq_util::Emulation;

/// Trait for storefront access - enables mocking for tests.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Fetches a product page and returns its HTML.
    async fn product_page(&self, url: &str) -> Result<String>;

    /// Adds `quantity` of a product to the cart and returns the raw JSON reply.
    async fn add_to_cart(&self, product_id: &str, quantity: u32) -> Result<String>;
}

/// Storefront client authenticated by a logged-in session cookie.
pub struct GrizlyClient {
    client: Client,
    cookie: String,
    cart_url: String,
}

impl GrizlyClient {
    /// Creates a client sending `session_cookie` with every request.
    pub fn new(config: &Config, session_cookie: &str) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            cookie: format!("{}={}", config.cookie_name, session_cookie),
            cart_url: config.cart_url.clone(),
        })
    }

    async fn read_body(response: wreq::Response, url: &str) -> Result<String> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Request to {} failed with status: {}", url, status);
        }

        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl Storefront for GrizlyClient {
    async fn product_page(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "cs-CZ,cs;q=0.9,en;q=0.8")
            .header("Cookie", &self.cookie)
            .send()
            .await
            .context("Failed to send request")?;

        Self::read_body(response, url).await
    }

    async fn add_to_cart(&self, product_id: &str, quantity: u32) -> Result<String> {
        let url = format!("{}?action=addpost&ajax=1", self.cart_url);
        let body = format!("counts[{}]={}", urlencoding::encode(product_id), quantity);

        debug!("POST {} {}", url, body);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Cookie", &self.cookie)
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::read_body(response, &url).await
    }
}
