//! Google Sheets access for the shopping list.

pub mod auth;
pub mod client;
pub mod range;

pub use auth::{ServiceAccount, StaticToken, TokenSource};
pub use client::{SheetsClient, ShoppingSheet, ValueInput};
pub use range::CellRange;

/// Column letters of the shopping-list worksheet.
///
/// `name`, `status`, `price` and `weight` must be adjacent, in that order,
/// since a successful row is written as one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub name: char,
    pub status: char,
    pub price: char,
    pub weight: char,
    pub url: char,
    pub quantity: char,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self { name: 'B', status: 'C', price: 'D', weight: 'E', url: 'F', quantity: 'G' }
    }
}

impl SheetLayout {
    /// URL and quantity columns over the row window.
    pub fn input(&self, first_row: u32, last_row: u32) -> CellRange {
        CellRange::new(self.url, first_row, self.quantity, last_row)
    }

    /// Price column over the row window.
    pub fn prices(&self, first_row: u32, last_row: u32) -> CellRange {
        CellRange::column(self.price, first_row, last_row)
    }

    /// Name through weight on one row.
    pub fn result(&self, row: u32) -> CellRange {
        CellRange::row(self.name, self.weight, row)
    }

    pub fn status(&self, row: u32) -> CellRange {
        CellRange::cell(self.status, row)
    }

    pub fn price(&self, row: u32) -> CellRange {
        CellRange::cell(self.price, row)
    }
}
