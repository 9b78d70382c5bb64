//! Error kinds for resolving and ordering a shopping-list line.

use thiserror::Error;

/// Failure while resolving, ordering, or recording a single line.
///
/// Only [`OrderError::OutOfStock`] is recovered at the row boundary; every
/// other kind aborts the run.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The page has no purchase control, or the cart rejected the order.
    #[error("{0}")]
    OutOfStock(String),

    /// Non-2xx response, timeout or connection failure.
    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),

    /// Required page element or response field missing or malformed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The store confirmed different terms than were requested.
    #[error("store confirmed {field} {actual}, expected {expected}")]
    Consistency { field: &'static str, expected: String, actual: String },

    /// Spreadsheet read/write failure.
    #[error("spreadsheet error: {0:#}")]
    Sheet(anyhow::Error),
}

impl OrderError {
    /// Builds a parse error from anything displayable.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// True when the run may continue with the next row.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::OutOfStock(_))
    }

    /// Status cell text for a recoverable failure, e.g. `x (Can not get id)`.
    pub fn status_marker(&self) -> String {
        format!("x ({})", self)
    }
}
