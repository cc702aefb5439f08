//! Formatting error types.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Grouping must be positive, got {0}")]
    InvalidGrouping(Decimal),
}

pub type FormatResult<T> = Result<T, FormatError>;
