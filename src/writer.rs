//! The write side of the buffer codec.

use crate::error::Result;
use crate::format::{LINE_FEED, RowcodeOptions};
use crate::record::Record;
use crate::row::encode_row;
use crate::schema::Schema;

/// Rough per-column size used to pre-size the output buffer.
const ESTIMATED_TOKEN_BYTES: usize = 12;

/// Encodes `records` as lines joined by `\n`, without a terminator after the last line.
///
/// With `write_header`, the column labels come first as their own line.
pub fn encode_all<R: Record>(records: &[R], schema: &Schema, options: &RowcodeOptions) -> Result<String> {
    let per_row = schema.len().max(1) * ESTIMATED_TOKEN_BYTES;
    let mut out = String::with_capacity(records.len().saturating_mul(per_row));

    if options.write_header {
        out.push_str(&schema.header_line(options.delimiter));
        if !records.is_empty() {
            out.push(char::from(LINE_FEED));
        }
    }

    for (row, record) in records.iter().enumerate() {
        if row > 0 {
            out.push(char::from(LINE_FEED));
        }
        encode_row(record, schema, options, &mut out).map_err(|e| e.at_row(row))?;
    }

    tracing::debug!(
        record = schema.type_name(),
        rows = records.len(),
        bytes = out.len(),
        "encoded buffer"
    );
    Ok(out)
}
