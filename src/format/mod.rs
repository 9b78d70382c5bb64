//! Output formatting for products and order summaries (table, JSON).

use crate::config::OutputFormat;
use crate::grizly::models::{OrderSummary, OrderedItem, Product};

const NAME_WIDTH: usize = 40;

/// Formats products and summaries for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single product.
    pub fn format_product(&self, product: &Product) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(product).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.table_single(product),
        }
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table if products.is_empty() => "No products found.".to_string(),
            OutputFormat::Table => {
                let mut lines = table_header();
                for product in products {
                    lines.push(table_row(product, None));
                }
                lines.join("\n")
            }
        }
    }

    /// Formats the products ordered in a run.
    pub fn format_summary(&self, summary: &OrderSummary) -> String {
        match self.format {
            OutputFormat::Json => {
                let items: Vec<&OrderedItem> = summary.items().collect();
                serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table if summary.is_empty() => "Nothing was ordered.".to_string(),
            OutputFormat::Table => self.table_summary(summary),
        }
    }

    fn table_single(&self, product: &Product) -> String {
        let weight = if product.weight > 0 {
            format!("{} g", product.weight)
        } else {
            "N/A".to_string()
        };

        [
            format!("ID:      {}", product.id),
            format!("Name:    {}", product.name),
            format!("Price:   {} Kč", product.price_display()),
            format!("Weight:  {}", weight),
            format!("URL:     {}", product.url),
        ]
        .join("\n")
    }

    fn table_summary(&self, summary: &OrderSummary) -> String {
        let mut lines = table_header();

        for item in summary.items() {
            lines.push(table_row(&item.product, Some(item.quantity)));
        }

        lines.push(String::new());
        lines.push(format!(
            "Ordered {} products, {} Kč, {:.2} kg",
            summary.len(),
            summary.total_price(),
            summary.total_weight() as f64 / 1000.0
        ));

        lines.join("\n")
    }
}

fn table_header() -> Vec<String> {
    vec![
        format!("{:<10}  {:>10}  {:>7}  {:>4}  {}", "ID", "Price", "Weight", "Qty", "Name"),
        format!("{:-<10}  {:->10}  {:->7}  {:->4}  {:-<width$}", "", "", "", "", "", width = NAME_WIDTH),
    ]
}

fn table_row(product: &Product, quantity: Option<u32>) -> String {
    let name = if product.name.chars().count() > NAME_WIDTH {
        let truncated: String = product.name.chars().take(NAME_WIDTH - 3).collect();
        format!("{}...", truncated)
    } else {
        product.name.clone()
    };

    let quantity = quantity.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string());

    format!(
        "{:<10}  {:>10}  {:>7}  {:>4}  {}",
        product.id,
        product.price_display(),
        format!("{} g", product.weight),
        quantity,
        name
    )
}
