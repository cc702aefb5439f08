//! Ladder formatting and snapshot payload assembly.
//!
//! Turns a raw L2 ladder into its canonical published form: optionally
//! price-grouped, depth-truncated, every numeric rendered as a base-10
//! string. Also assembles the enriched JSON payload that goes to the wire.

pub mod error;
pub mod formatter;
pub mod payload;

pub use error::{FormatError, FormatResult};
pub use formatter::{format_book, FormattedBook, FormattedLevel};
pub use payload::{BookPayload, OraclePayload, PayloadBuilder};
