//! Centralized error handling for rowcode.
//!
//! Every failure in the codec surfaces as a [`RowcodeError`]. Nothing is retried and nothing is
//! substituted: a single bad token aborts the row, and a bad row aborts the whole buffer.
//!
//! ## Error Categories
//!
//! - **Schema Errors** ([`RowcodeError::Schema`]): a participating field has a nested kind
//!   (another record, a `Vec`, a `Box`). Raised when the field is first touched.
//! - **Conversion Errors** ([`RowcodeError::Conversion`]): a token could not be parsed into its
//!   field kind, a value could not be rendered, or a line has the wrong number of columns.
//! - **Option Errors** ([`RowcodeError::InvalidOptions`]): the caller supplied a delimiter that
//!   collides with the line terminators.
//! - **I/O Errors** ([`RowcodeError::Io`]): file helpers only.
//! - **Internal Errors** ([`RowcodeError::Internal`]): logic errors (please report as bugs).
//!
//! ## Usage Patterns
//!
//! ```rust
//! use rowcode::{Rowcode, RowcodeError, RowcodeRecord};
//!
//! #[derive(RowcodeRecord, Debug, PartialEq)]
//! struct Reading {
//!     #[rowcode(column = 1)]
//!     id: i32,
//! }
//!
//! match Rowcode::deserialize::<Reading>("not-a-number") {
//!     Ok(rows) => println!("decoded {} rows", rows.len()),
//!     Err(RowcodeError::Conversion(msg)) => eprintln!("bad input: {msg}"),
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! ```

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// A specialized `Result` type for rowcode operations.
pub type Result<T> = std::result::Result<T, RowcodeError>;

/// The master error enum covering all failure domains in rowcode.
///
/// This type is `Clone` so the parallel decoder can capture an error on a worker thread and hand
/// it back to the caller. I/O errors are wrapped in `Arc` to make that cheap.
#[derive(Debug, Clone, Error)]
pub enum RowcodeError {
    /// A field selected for serialization is not a flat scalar kind.
    #[error("Schema Error: {0}")]
    Schema(String),

    /// A token could not be converted to (or from) its field kind.
    ///
    /// Column-count mismatches on a line are reported through this variant as well.
    #[error("Conversion Error: {0}")]
    Conversion(String),

    /// The supplied [`RowcodeOptions`](crate::RowcodeOptions) cannot be used.
    #[error("Invalid Options: {0}")]
    InvalidOptions(String),

    /// Low-level I/O failure from the file helpers.
    #[error("I/O Error: {0}")]
    Io(#[source] Arc<io::Error>),

    /// Logic error inside the codec. Should not occur in production.
    #[error("Internal Logic Error: {0}")]
    Internal(String),
}

impl RowcodeError {
    /// Prefixes a schema or conversion message with the field it concerns.
    #[must_use]
    pub fn in_field(self, field: &str) -> Self {
        self.map_message(|msg| format!("field `{field}`: {msg}"))
    }

    /// Prefixes a schema or conversion message with the 0-based data row it came from.
    #[must_use]
    pub fn at_row(self, row: usize) -> Self {
        self.map_message(|msg| format!("row {row}: {msg}"))
    }

    /// Returns true for [`RowcodeError::Schema`].
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns true for [`RowcodeError::Conversion`].
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion(_))
    }

    fn map_message(self, f: impl FnOnce(&str) -> String) -> Self {
        match self {
            Self::Schema(msg) => Self::Schema(f(&msg)),
            Self::Conversion(msg) => Self::Conversion(f(&msg)),
            other => other,
        }
    }
}

impl From<io::Error> for RowcodeError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
