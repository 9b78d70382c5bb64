//! Resolving a product page and placing it in the cart.

use crate::error::OrderError;
use crate::grizly::client::Storefront;
use crate::grizly::models::{CartResponse, Product};
use crate::grizly::parser::{CatalogPage, HtmlCatalogPage};
use tracing::{debug, info};

/// Fetches `url` and extracts its product record.
///
/// Fails with [`OrderError::OutOfStock`] when the page has no purchase
/// control. Missing title or price is a [`OrderError::Parse`].
pub async fn resolve(store: &impl Storefront, url: &str) -> Result<Product, OrderError> {
    info!("Getting: {}", url);

    let html = store.product_page(url).await.map_err(OrderError::Transport)?;
    let page = HtmlCatalogPage::parse(&html);

    let product = resolve_page(&page, url)?;
    info!("Got: {} ({}) {} Kč, {} g", product.name, product.id, product.price, product.weight);
    Ok(product)
}

/// Builds a [`Product`] from an already parsed page.
pub fn resolve_page(page: &impl CatalogPage, url: &str) -> Result<Product, OrderError> {
    let Some(id) = page.product_id()? else {
        return Err(OrderError::OutOfStock("Can not get id".to_string()));
    };

    Ok(Product {
        id,
        name: page.name()?,
        price: page.price()?,
        weight: page.weight(),
        url: url.to_string(),
    })
}

/// Orders `quantity` of `product` and checks the store's confirmation.
///
/// A rejected order is [`OrderError::OutOfStock`]. A confirmation whose
/// whole-crown price or quantity differs from what was resolved is
/// [`OrderError::Consistency`]; the order may already be placed by then.
pub async fn submit(
    store: &impl Storefront,
    product: &Product,
    quantity: u32,
) -> Result<(), OrderError> {
    let body = store.add_to_cart(&product.id, quantity).await.map_err(OrderError::Transport)?;
    debug!("Cart response: {}", body);

    let response: CartResponse = serde_json::from_str(&body)
        .map_err(|e| OrderError::parse(format!("invalid cart response: {}", e)))?;

    if !response.isok {
        return Err(OrderError::OutOfStock("Can not order".to_string()));
    }

    let item = response
        .basket_item
        .ok_or_else(|| OrderError::parse("cart response has no basketItem"))?;

    let expected_price = product
        .whole_price()
        .ok_or_else(|| OrderError::parse(format!("price {} out of range", product.price)))?;

    if item.price_with_vat != expected_price {
        return Err(OrderError::Consistency {
            field: "price",
            expected: expected_price.to_string(),
            actual: item.price_with_vat.to_string(),
        });
    }

    if item.quantity != quantity {
        return Err(OrderError::Consistency {
            field: "quantity",
            expected: quantity.to_string(),
            actual: item.quantity.to_string(),
        });
    }

    info!("Ordered {} x {}", quantity, product.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Mutex;

    /// Mock storefront for testing.
    struct MockStore {
        page_html: String,
        cart_json: String,
        should_fail: bool,
        carts: Mutex<Vec<(String, u32)>>,
    }

    impl MockStore {
        fn new(page_html: &str, cart_json: &str) -> Self {
            Self {
                page_html: page_html.to_string(),
                cart_json: cart_json.to_string(),
                should_fail: false,
                carts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self { should_fail: true, ..Self::new("", "") }
        }
    }

    #[async_trait]
    impl Storefront for MockStore {
        async fn product_page(&self, _url: &str) -> Result<String> {
            if self.should_fail {
                anyhow::bail!("Simulated network error")
            }
            Ok(self.page_html.clone())
        }

        async fn add_to_cart(&self, product_id: &str, quantity: u32) -> Result<String> {
            if self.should_fail {
                anyhow::bail!("Simulated network error")
            }
            self.carts.lock().unwrap().push((product_id.to_string(), quantity));
            Ok(self.cart_json.clone())
        }
    }

    fn make_page_html(price: &str) -> String {
        format!(
            r#"<div id="product_detail_content">
                <h1>Pistácie pražené</h1>
                <a class="js-package_item active"><span>500 g</span></a>
                <div class="primary">{} Kč</div>
                <form><input data-pid="4711"></form>
            </div>"#,
            price
        )
    }

    fn make_product(price: &str) -> Product {
        Product {
            id: "4711".to_string(),
            name: "Pistácie pražené".to_string(),
            price: Decimal::from_str(price).unwrap(),
            weight: 500,
            url: "https://www.grizly.cz/pistacie".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let store = MockStore::new(&make_page_html("150"), "");
        let product = resolve(&store, "https://www.grizly.cz/pistacie").await.unwrap();
        assert_eq!(product, make_product("150"));
    }

    #[tokio::test]
    async fn test_resolve_without_purchase_control_is_out_of_stock() {
        let html = r#"<div id="product_detail_content"><h1>Vyprodáno</h1>
            <div class="primary">150 Kč</div></div>"#;
        let store = MockStore::new(html, "");

        let err = resolve(&store, "https://www.grizly.cz/x").await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Can not get id");
    }

    #[tokio::test]
    async fn test_resolve_missing_price_is_fatal() {
        let html = r#"<div id="product_detail_content"><h1>Bez ceny</h1>
            <form><input data-pid="1"></form></div>"#;
        let store = MockStore::new(html, "");

        let err = resolve(&store, "https://www.grizly.cz/x").await.unwrap_err();
        assert!(matches!(err, OrderError::Parse(_)));
    }

    #[tokio::test]
    async fn test_resolve_network_error_is_transport() {
        let store = MockStore::failing();
        let err = resolve(&store, "https://www.grizly.cz/x").await.unwrap_err();
        assert!(matches!(err, OrderError::Transport(_)));
        assert!(err.to_string().contains("network error"));
    }

    #[tokio::test]
    async fn test_submit_success() {
        let store =
            MockStore::new("", r#"{"isok": true, "basketItem": {"priceWithVat": 150, "quantity": 2}}"#);
        submit(&store, &make_product("150"), 2).await.unwrap();
        assert_eq!(*store.carts.lock().unwrap(), vec![("4711".to_string(), 2)]);
    }

    #[tokio::test]
    async fn test_submit_rejected_is_out_of_stock() {
        let store = MockStore::new("", r#"{"isok": false}"#);
        let err = submit(&store, &make_product("150"), 2).await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Can not order");
    }

    #[tokio::test]
    async fn test_submit_price_mismatch_is_fatal() {
        let store =
            MockStore::new("", r#"{"isok": true, "basketItem": {"priceWithVat": 149, "quantity": 2}}"#);
        let err = submit(&store, &make_product("150"), 2).await.unwrap_err();
        assert!(!err.is_recoverable());
        assert!(matches!(err, OrderError::Consistency { field: "price", .. }));
    }

    #[tokio::test]
    async fn test_submit_quantity_mismatch_is_fatal() {
        let store =
            MockStore::new("", r#"{"isok": true, "basketItem": {"priceWithVat": 150, "quantity": 1}}"#);
        let err = submit(&store, &make_product("150"), 2).await.unwrap_err();
        assert!(matches!(err, OrderError::Consistency { field: "quantity", .. }));
    }

    #[tokio::test]
    async fn test_submit_compares_truncated_price() {
        let store =
            MockStore::new("", r#"{"isok": true, "basketItem": {"priceWithVat": 150, "quantity": 1}}"#);
        submit(&store, &make_product("150.90"), 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_invalid_json_is_parse_error() {
        let store = MockStore::new("", "<html>login</html>");
        let err = submit(&store, &make_product("150"), 1).await.unwrap_err();
        assert!(matches!(err, OrderError::Parse(_)));
    }

    #[tokio::test]
    async fn test_submit_missing_isok_is_parse_error() {
        let store = MockStore::new("", r#"{"error": "not logged in"}"#);
        let err = submit(&store, &make_product("150"), 1).await.unwrap_err();
        assert!(matches!(err, OrderError::Parse(_)));
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("invalid cart response"));
    }

    #[tokio::test]
    async fn test_submit_ok_without_item_is_parse_error() {
        let store = MockStore::new("", r#"{"isok": true}"#);
        let err = submit(&store, &make_product("150"), 1).await.unwrap_err();
        assert!(err.to_string().contains("basketItem"));
    }
}
