//! # Rowcode
//!
//! A declarative codec between slices of flat Rust structs and delimited text (CSV-style).
//!
//! ## Overview
//!
//! Instead of reading columns by position in caller code, a record type declares which of its
//! fields are columns and where they sit on the line. The codec derives an ordered schema from
//! that declaration once per type and uses it for every row.
//!
//! ### Key Features
//!
//! *   **Derived Mappings:** `#[derive(RowcodeRecord)]` turns `#[rowcode(column = N)]`
//!     annotations into a static field table. No runtime type inspection per row.
//! *   **Text and Byte Inputs:** Buffers decode from `&str` or `&[u8]` with identical line rules
//!     (`\n` or `\r\n`, optional header line, unterminated last line).
//! *   **Tick Timestamps:** [`Timestamp`] values travel as integer tick counts and round-trip
//!     bit-for-bit.
//! *   **Parallel Decoding:** Large buffers are decoded on the rayon pool with all-or-nothing
//!     commit and the same error as a sequential decode would report.
//! *   **Memory-Mapped Loading:** [`Rowcode::load`] decodes directly from a mapped file.
//!
//! ## Format
//!
//! ```text
//! 131,95037cad-434c-4a37-8e81-7952a3d73d1a,638099574626108018,2.120028155888176
//! ```
//!
//! One record per line, columns in ascending declared order, one delimiter between tokens and
//! none after the last. There is no quoting: a string value containing the delimiter corrupts
//! the alignment of its row. This is a documented limitation of the format.
//!
//! ## Usage
//!
//! ```rust
//! use rowcode::{Rowcode, RowcodeRecord, Timestamp};
//! use uuid::Uuid;
//!
//! #[derive(RowcodeRecord, Debug, Clone, PartialEq)]
//! struct WeatherTemperature {
//!     #[rowcode(column = 1)]
//!     country_id: i32,
//!     #[rowcode(column = 2)]
//!     city_id: Uuid,
//!     #[rowcode(column = 3)]
//!     time_generated: Timestamp,
//!     #[rowcode(column = 4)]
//!     temperature: f64,
//! }
//!
//! let line = "131,95037cad-434c-4a37-8e81-7952a3d73d1a,638099574626108018,2.120028155888176";
//! let rows: Vec<WeatherTemperature> = Rowcode::deserialize(line)?;
//! assert_eq!(rows[0].country_id, 131);
//! assert_eq!(rows[0].time_generated.ticks(), 638_099_574_626_108_018);
//! assert_eq!(Rowcode::serialize(&rows)?, line);
//! # Ok::<(), rowcode::RowcodeError>(())
//! ```
//!
//! ### Safety and Error Handling
//!
//! * **Encapsulated Unsafe:** `unsafe` is used only to memory-map files in the `io` module.
//! * **No Panics:** No `unwrap()` or `panic!()` calls in the library (enforced by clippy lints).
//! * **Comprehensive Errors:** All failures correspond to a [`RowcodeError`]; nothing is
//!   substituted with a default and no partial collection is ever returned.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// Lets the derive macro's `rowcode::` paths resolve inside this crate's own tests.
extern crate self as rowcode;

// --- PUBLIC API MODULES ---
pub mod api;
pub mod convert;
pub mod error;
pub mod format;
pub mod record;
pub mod schema;
pub mod timestamp;

// --- INTERNAL IMPLEMENTATION MODULES (Hidden from Docs) ---
#[doc(hidden)]
pub mod executor;
#[doc(hidden)]
pub mod io;
#[doc(hidden)]
pub mod reader;
#[doc(hidden)]
pub mod row;
#[doc(hidden)]
pub mod writer;

// --- MACRO SUPPORT MODULES ---

/// Runtime utilities used by the derived code.
#[doc(hidden)]
pub mod rt;

// --- RE-EXPORTS ---

pub use api::{Rowcode, RowcodeBuilder};
pub use convert::ColumnType;
pub use error::{Result, RowcodeError};
pub use format::RowcodeOptions;
pub use record::Record;
pub use schema::{FieldKind, Schema};
pub use timestamp::Timestamp;

// UUID columns use this crate's type.
pub use uuid::Uuid;

// Re-export the derive macro so it is accessible as `rowcode::RowcodeRecord`
pub use rowcode_derive::RowcodeRecord;

/// Constants used throughout the library.
pub mod constants {
    /// The default buffer size for file writes.
    pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
}
