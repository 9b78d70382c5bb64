//! A1 notation and grid ranges for single-letter columns.

use serde::Serialize;
use std::fmt;

/// A rectangular block of cells, rows 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start_col: char,
    pub start_row: u32,
    pub end_col: char,
    pub end_row: u32,
}

impl CellRange {
    /// Block from `start_col{start_row}` to `end_col{end_row}`.
    pub fn new(start_col: char, start_row: u32, end_col: char, end_row: u32) -> Self {
        Self { start_col, start_row, end_col, end_row }
    }

    /// One column over a span of rows.
    pub fn column(col: char, start_row: u32, end_row: u32) -> Self {
        Self::new(col, start_row, col, end_row)
    }

    /// One row over a span of columns.
    pub fn row(start_col: char, end_col: char, row: u32) -> Self {
        Self::new(start_col, row, end_col, row)
    }

    /// A single cell.
    pub fn cell(col: char, row: u32) -> Self {
        Self::new(col, row, col, row)
    }

    /// Worksheet-qualified A1 notation, e.g. `'Nákup'!F4:G200`.
    pub fn qualified(&self, worksheet: &str) -> String {
        format!("'{}'!{}", worksheet.replace('\'', "''"), self)
    }

    /// Zero-based, end-exclusive grid range for batchUpdate requests.
    pub fn grid(&self, sheet_id: i64) -> GridRange {
        GridRange {
            sheet_id,
            start_row_index: self.start_row.saturating_sub(1),
            end_row_index: self.end_row,
            start_column_index: column_index(self.start_col),
            end_column_index: column_index(self.end_col) + 1,
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_col == self.end_col && self.start_row == self.end_row {
            write!(f, "{}{}", self.start_col, self.start_row)
        } else {
            write!(f, "{}{}:{}{}", self.start_col, self.start_row, self.end_col, self.end_row)
        }
    }
}

/// Sheets API `GridRange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: u32,
    pub end_row_index: u32,
    pub start_column_index: u32,
    pub end_column_index: u32,
}

fn column_index(col: char) -> u32 {
    (col.to_ascii_uppercase() as u32).saturating_sub('A' as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CellRange::new('F', 4, 'G', 200).to_string(), "F4:G200");
        assert_eq!(CellRange::cell('C', 5).to_string(), "C5");
        assert_eq!(CellRange::row('B', 'E', 4).to_string(), "B4:E4");
        assert_eq!(CellRange::column('D', 4, 200).to_string(), "D4:D200");
    }

    #[test]
    fn test_qualified_quotes_worksheet() {
        let range = CellRange::new('F', 4, 'G', 200);
        assert_eq!(range.qualified("Nákup"), "'Nákup'!F4:G200");
        assert_eq!(range.qualified("Pepa's list"), "'Pepa''s list'!F4:G200");
    }

    #[test]
    fn test_grid_is_zero_based_end_exclusive() {
        let grid = CellRange::column('D', 4, 200).grid(42);
        assert_eq!(
            grid,
            GridRange {
                sheet_id: 42,
                start_row_index: 3,
                end_row_index: 200,
                start_column_index: 3,
                end_column_index: 4,
            }
        );
    }

    #[test]
    fn test_grid_serializes_camel_case() {
        let json = serde_json::to_value(CellRange::cell('A', 1).grid(0)).unwrap();
        assert_eq!(json["sheetId"], 0);
        assert_eq!(json["startRowIndex"], 0);
        assert_eq!(json["endColumnIndex"], 1);
    }
}
