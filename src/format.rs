//! Defines the textual layout of a rowcode buffer and the options that shape it.
//!
//! # Layout
//! One record per line, lines separated by a single `\n`, no terminator after the last line.
//! `\r\n` is accepted on input and the carriage return is dropped from the row.
//!
//! `[header line \n] row 0 \n row 1 \n ... row N-1`
//!
//! Inside a row, tokens appear in ascending column order separated by exactly one delimiter.
//! There is no quoting and no escaping: a delimiter inside a string value shifts every later
//! column of that row.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RowcodeError};

/// Line terminator written between rows.
pub const LINE_FEED: u8 = b'\n';

/// Optional carriage return preceding [`LINE_FEED`] on input.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// The default column delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Minimum number of rows before the parallel decoder is used.
pub const PARALLEL_ROW_THRESHOLD: usize = 8 * 1024;

/// Options passed into every codec call.
///
/// The value is immutable for the duration of a call. It is `Copy`, so every entry point takes
/// it by reference and no call can observe another call's options.
///
/// ```rust
/// use rowcode::RowcodeOptions;
///
/// let options = RowcodeOptions::default().with_delimiter(';').with_header(true);
/// assert_eq!(options.delimiter, ';');
/// assert!(options.has_header);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowcodeOptions {
    /// Single character separating tokens within a row.
    pub delimiter: char,
    /// The first line of the input is metadata and is skipped by the decoder.
    pub has_header: bool,
    /// The encoder emits a header line of column labels before the first row.
    pub write_header: bool,
    /// Large inputs may be decoded on the rayon pool.
    pub parallel: bool,
}

impl Default for RowcodeOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            has_header: false,
            write_header: false,
            parallel: true,
        }
    }
}

impl RowcodeOptions {
    /// Returns a copy using `delimiter` between columns.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Returns a copy that skips the first input line when decoding.
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Returns a copy that writes a header line when encoding.
    #[must_use]
    pub fn with_header_output(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    /// Returns a copy with the parallel decoder enabled or disabled.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks that the options describe a layout the codec can split unambiguously.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == char::from(LINE_FEED) || self.delimiter == char::from(CARRIAGE_RETURN)
        {
            return Err(RowcodeError::InvalidOptions(format!(
                "delimiter {:?} collides with the line terminator",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// The delimiter encoded as UTF-8, for the byte path.
    pub(crate) fn delimiter_bytes(&self, buf: &mut [u8; 4]) -> usize {
        self.delimiter.encode_utf8(buf).len()
    }
}
