//! Sheet-driven ordering: read the shopping list, order each line, write
//! the outcome back.

use crate::config::Config;
use crate::error::OrderError;
use crate::format::Formatter;
use crate::grizly::models::{OrderSummary, Product};
use crate::grizly::{resolve, submit, GrizlyClient, Storefront};
use crate::sheets::{
    ServiceAccount, SheetLayout, SheetsClient, ShoppingSheet, StaticToken, TokenSource, ValueInput,
};
use anyhow::{Context, Result};
use serde_json::json;
use tracing::{debug, info, warn};

/// One orderable line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingLine {
    /// 1-based worksheet row
    pub row: u32,
    pub url: String,
    pub quantity: u32,
}

/// Turns the raw URL/quantity block into orderable lines.
///
/// Rows with an empty URL, or a quantity that is empty, not an integer, or
/// not positive, are dropped.
pub fn shopping_lines(first_row: u32, rows: Vec<Vec<String>>) -> Vec<ShoppingLine> {
    rows.into_iter()
        .zip(first_row..)
        .filter_map(|(cells, row)| {
            let mut cells = cells.into_iter();
            let url = cells.next().unwrap_or_default().trim().to_string();
            let quantity = cells.next().unwrap_or_default();

            if url.is_empty() {
                return None;
            }

            match quantity.trim().parse::<i64>() {
                Ok(q) if q > 0 => match u32::try_from(q) {
                    Ok(quantity) => Some(ShoppingLine { row, url, quantity }),
                    Err(_) => {
                        warn!("Row {}: quantity {} too large, skipping", row, q);
                        None
                    }
                },
                _ => {
                    debug!("Row {}: no positive quantity ({:?}), skipping", row, quantity);
                    None
                }
            }
        })
        .collect()
}

/// Orders everything on a shopping-list worksheet.
pub struct OrderCommand {
    config: Config,
    layout: SheetLayout,
}

impl OrderCommand {
    /// Creates a new order command.
    pub fn new(config: Config) -> Self {
        Self { config, layout: SheetLayout::default() }
    }

    /// Connects to the store and the spreadsheet, runs the order, and returns
    /// the formatted summary.
    pub async fn execute(
        &self,
        session_cookie: &str,
        spreadsheet_id: &str,
        worksheet: &str,
        access_token: Option<String>,
    ) -> Result<String> {
        self.config.validate()?;

        let store = GrizlyClient::new(&self.config, session_cookie)
            .context("Failed to create store client")?;

        let tokens: Box<dyn TokenSource> = match access_token {
            Some(token) => Box::new(StaticToken::new(token)),
            None => Box::new(
                ServiceAccount::from_file(&self.config.google_api_auth, self.config.timeout_secs)
                    .context("Failed to load Google API credentials")?,
            ),
        };

        let sheet = SheetsClient::open(&self.config, tokens, spreadsheet_id, worksheet)
            .await
            .context("Failed to open worksheet")?;

        let summary = self.run(&store, &sheet).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_summary(&summary))
    }

    /// Processes every line in row order.
    ///
    /// Out-of-stock lines are marked in the status column and skipped; any
    /// other failure stops the run, leaving rows already written in place.
    pub async fn run(
        &self,
        store: &impl Storefront,
        sheet: &impl ShoppingSheet,
    ) -> Result<OrderSummary, OrderError> {
        let first_row = self.config.first_row;
        let last_row = self.config.max_rows;

        let rows = sheet.read(self.layout.input(first_row, last_row)).await.map_err(OrderError::Sheet)?;

        // Prices stay struck through until their row is ordered
        sheet
            .set_strikethrough(self.layout.prices(first_row, last_row), true)
            .await
            .map_err(OrderError::Sheet)?;

        let lines = shopping_lines(first_row, rows);
        info!("{} lines to order", lines.len());

        let mut summary = OrderSummary::new();

        for line in lines {
            match order_line(store, &line).await {
                Ok(product) => {
                    self.record_success(sheet, line.row, &product).await?;

                    if let Some(previous) = summary.insert(product, line.quantity) {
                        warn!(
                            "Row {}: product already ordered with quantity {}, now {}",
                            line.row, previous, line.quantity
                        );
                    }
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Out of stock ({}): {}", e, line.url);
                    sheet
                        .write_row(
                            self.layout.status(line.row),
                            vec![json!(e.status_marker())],
                            ValueInput::Raw,
                        )
                        .await
                        .map_err(OrderError::Sheet)?;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    async fn record_success(
        &self,
        sheet: &impl ShoppingSheet,
        row: u32,
        product: &Product,
    ) -> Result<(), OrderError> {
        let values = vec![
            json!(product.name),
            json!("ok"),
            json!(product.price_display()),
            json!(product.weight),
        ];

        sheet
            .write_row(self.layout.result(row), values, ValueInput::UserEntered)
            .await
            .map_err(OrderError::Sheet)?;

        sheet.set_strikethrough(self.layout.price(row), false).await.map_err(OrderError::Sheet)
    }
}

async fn order_line(store: &impl Storefront, line: &ShoppingLine) -> Result<Product, OrderError> {
    let product = resolve(store, &line.url).await?;
    submit(store, &product, line.quantity).await?;
    Ok(product)
}
