//! The read side of the buffer codec.
//!
//! Text and byte inputs share one line splitter, so both follow identical rules:
//!
//! * `\n` ends a line; a `\r` immediately before it is not part of the row.
//! * With `has_header`, the first line is skipped without being looked at.
//! * Every `\n` separates two rows, so the segment after the last terminator is always a row,
//!   even when it is empty. A buffer with `k` terminators holds `k + 1` lines.
//! * An empty buffer holds no rows. This is the one buffer where an empty line is not a row.
//!
//! Line views borrow the caller's buffer; nothing is copied until a token becomes a field value.

use std::ops::Range;

use crate::error::Result;
use crate::executor::decode_rows;
use crate::format::{CARRIAGE_RETURN, LINE_FEED, RowcodeOptions};
use crate::record::Record;
use crate::row::{decode_row_bytes, decode_row_str};
use crate::schema::Schema;

/// Byte ranges of every data row in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSplitter {
    rows: Vec<Range<usize>>,
}

impl LineSplitter {
    /// Scans `buffer` for row boundaries.
    pub fn split(buffer: &[u8], has_header: bool) -> Self {
        if buffer.is_empty() {
            return Self { rows: Vec::new() };
        }
        let terminators = buffer.iter().filter(|&&b| b == LINE_FEED).count();
        let mut rows = Vec::with_capacity(Self::row_count(buffer, terminators, has_header));

        let mut skip_header = has_header;
        let mut start = 0;
        for (pos, _) in buffer.iter().enumerate().filter(|&(_, &b)| b == LINE_FEED) {
            if skip_header {
                skip_header = false;
            } else {
                rows.push(start..trim_carriage_return(buffer, start, pos));
            }
            start = pos + 1;
        }
        if !skip_header {
            rows.push(start..buffer.len());
        }
        Self { rows }
    }

    /// Expected number of data rows, from the terminator count alone.
    fn row_count(buffer: &[u8], terminators: usize, has_header: bool) -> usize {
        if buffer.is_empty() {
            return 0;
        }
        (terminators + 1).saturating_sub(usize::from(has_header))
    }

    /// Row ranges in input order.
    pub fn rows(&self) -> &[Range<usize>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the buffer holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn trim_carriage_return(buffer: &[u8], start: usize, end: usize) -> usize {
    if end > start && buffer[end - 1] == CARRIAGE_RETURN {
        end - 1
    } else {
        end
    }
}

/// Decodes every row of a text buffer.
pub fn decode_all_str<R: Record + Send>(
    text: &str,
    schema: &Schema,
    options: &RowcodeOptions,
) -> Result<Vec<R>> {
    let lines = LineSplitter::split(text.as_bytes(), options.has_header);
    tracing::debug!(
        record = schema.type_name(),
        rows = lines.len(),
        bytes = text.len(),
        "decoding text buffer"
    );
    // Ranges end at ASCII terminators, so they always fall on char boundaries.
    decode_rows(lines.rows(), options, |range| {
        decode_row_str(&text[range.clone()], schema, options)
    })
}

/// Decodes every row of a byte buffer.
pub fn decode_all_bytes<R: Record + Send>(
    bytes: &[u8],
    schema: &Schema,
    options: &RowcodeOptions,
) -> Result<Vec<R>> {
    let lines = LineSplitter::split(bytes, options.has_header);
    tracing::debug!(
        record = schema.type_name(),
        rows = lines.len(),
        bytes = bytes.len(),
        "decoding byte buffer"
    );
    decode_rows(lines.rows(), options, |range| {
        decode_row_bytes(&bytes[range.clone()], schema, options)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows<'a>(buffer: &'a str, has_header: bool) -> Vec<&'a str> {
        LineSplitter::split(buffer.as_bytes(), has_header)
            .rows()
            .iter()
            .map(|r| &buffer[r.clone()])
            .collect()
    }

    #[test]
    fn unterminated_buffer_is_one_row() {
        assert_eq!(rows("1,2,3", false), ["1,2,3"]);
    }

    #[test]
    fn crlf_and_lf_terminators_mix() {
        assert_eq!(rows("a\r\nb\nc\r\nd", false), ["a", "b", "c", "d"]);
    }

    #[test]
    fn header_is_skipped_whatever_it_contains() {
        assert_eq!(rows("\"broken,,header\r\nx\ny", true), ["x", "y"]);
        assert!(rows("only-a-header", true).is_empty());
        assert_eq!(rows("only-a-header\n", true), [""]);
    }

    #[test]
    fn segment_after_the_last_terminator_is_a_row() {
        assert_eq!(rows("a\nb\n", false), ["a", "b", ""]);
        assert_eq!(rows("a\r\n", false), ["a", ""]);
        assert_eq!(rows("a\n\nb", false), ["a", "", "b"]);
        assert_eq!(rows("\n\n", false), ["", "", ""]);
    }

    #[test]
    fn empty_buffer_has_no_rows() {
        assert!(rows("", false).is_empty());
        assert!(rows("", true).is_empty());
    }

    #[test]
    fn capacity_estimate_matches_actual_rows() {
        let cases = [
            ("a\nb", false),
            ("h\na\nb\n", true),
            ("\n", false),
            ("x", true),
            ("", true),
        ];
        for (buffer, header) in cases {
            let split = LineSplitter::split(buffer.as_bytes(), header);
            let terminators = buffer.matches('\n').count();
            assert_eq!(
                LineSplitter::row_count(buffer.as_bytes(), terminators, header),
                split.len(),
                "buffer {buffer:?}"
            );
        }
    }
}
