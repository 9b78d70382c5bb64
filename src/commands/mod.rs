//! CLI command implementations.

pub mod order;
pub mod product;

pub use order::OrderCommand;
pub use product::ProductCommand;
