//! The row codec: one record to one line and back.
//!
//! Encoding walks the schema in column order and writes exactly one delimiter between tokens,
//! none at the end. Decoding splits at every delimiter, checks each column as it is reached,
//! reorders the tokens into declaration order and hands them to the record's generated
//! constructor.

use smallvec::SmallVec;

use crate::error::{Result, RowcodeError};
use crate::format::RowcodeOptions;
use crate::record::Record;
use crate::schema::{FieldMapping, Schema};

/// Rows with at most this many columns are tokenized without a heap allocation.
const INLINE_COLUMNS: usize = 16;

/// Appends the line for `record` to `out`.
pub fn encode_row<R: Record>(
    record: &R,
    schema: &Schema,
    options: &RowcodeOptions,
    out: &mut String,
) -> Result<()> {
    for (position, field) in schema.fields().iter().enumerate() {
        check_scalar(field)?;
        if position > 0 {
            out.push(options.delimiter);
        }
        record.encode_field(field.index, out)?;
    }
    Ok(())
}

/// Decodes one text line.
pub fn decode_row_str<R: Record>(line: &str, schema: &Schema, options: &RowcodeOptions) -> Result<R> {
    let mut tokens: SmallVec<[&str; INLINE_COLUMNS]> = SmallVec::from_elem("", schema.len());
    let split = line.split(options.delimiter);
    let found = place_tokens(split, schema, &mut tokens, line.is_empty(), check_scalar)?;
    check_count(found, schema)?;
    R::decode_text(&tokens)
}

/// Decodes one byte line.
///
/// Kinds without a byte-path parser fail here, at their column, instead of being skipped.
pub fn decode_row_bytes<R: Record>(
    line: &[u8],
    schema: &Schema,
    options: &RowcodeOptions,
) -> Result<R> {
    let mut buf = [0u8; 4];
    let len = options.delimiter_bytes(&mut buf);
    let mut tokens: SmallVec<[&[u8]; INLINE_COLUMNS]> = SmallVec::from_elem(&[][..], schema.len());
    let splitter = ByteTokens::new(line, &buf[..len]);
    let empty_line = line.is_empty();
    let found = place_tokens(splitter, schema, &mut tokens, empty_line, check_byte_decodable)?;
    check_count(found, schema)?;
    R::decode_bytes(&tokens)
}

/// Moves tokens into declaration order, running `check` on each column as it is reached.
///
/// Returns the number of tokens on the line.
fn place_tokens<T: Copy>(
    split: impl Iterator<Item = T>,
    schema: &Schema,
    slots: &mut [T],
    empty_line: bool,
    check: fn(&FieldMapping) -> Result<()>,
) -> Result<usize> {
    if schema.is_empty() {
        return Ok(if empty_line { 0 } else { split.count() });
    }
    let mut found = 0;
    for token in split {
        if let Some(field) = schema.fields().get(found) {
            check(field)?;
            slots[field.index] = token;
        }
        found += 1;
    }
    Ok(found)
}

fn check_scalar(field: &FieldMapping) -> Result<()> {
    if field.kind.is_scalar() {
        Ok(())
    } else {
        Err(RowcodeError::Schema(format!(
            "column {} (`{}`) is a nested type; only flat scalar fields are supported",
            field.column, field.name
        )))
    }
}

fn check_byte_decodable(field: &FieldMapping) -> Result<()> {
    check_scalar(field)?;
    if field.kind.has_byte_decoder() {
        Ok(())
    } else {
        Err(RowcodeError::Conversion(format!(
            "column {} (`{}`): {} fields cannot be decoded from bytes",
            field.column, field.name, field.kind
        )))
    }
}

fn check_count(found: usize, schema: &Schema) -> Result<()> {
    if found == schema.len() {
        Ok(())
    } else {
        Err(RowcodeError::Conversion(format!(
            "expected {} columns for {}, found {found}",
            schema.len(),
            schema.type_name()
        )))
    }
}

/// Splits a byte line at every occurrence of a (possibly multi-byte) delimiter.
struct ByteTokens<'a> {
    rest: Option<&'a [u8]>,
    delimiter: &'a [u8],
}

impl<'a> ByteTokens<'a> {
    fn new(line: &'a [u8], delimiter: &'a [u8]) -> Self {
        Self {
            rest: Some(line),
            delimiter,
        }
    }

    fn find_delimiter(&self, haystack: &[u8]) -> Option<usize> {
        match self.delimiter {
            [single] => haystack.iter().position(|b| b == single),
            sequence => haystack.windows(sequence.len()).position(|w| w == sequence),
        }
    }
}

impl<'a> Iterator for ByteTokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match self.find_delimiter(rest) {
            Some(pos) => {
                self.rest = Some(&rest[pos + self.delimiter.len()..]);
                Some(&rest[..pos])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldKind};

    /// Hand-written record so the row codec is tested without the derive macro.
    #[derive(Debug, PartialEq)]
    struct Pair {
        label: String,
        count: i64,
    }

    impl Record for Pair {
        // Declared out of column order on purpose.
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor { name: "label", column: 2, kind: FieldKind::String },
            FieldDescriptor { name: "count", column: 1, kind: FieldKind::Int64 },
        ];

        fn encode_field(&self, index: usize, out: &mut String) -> Result<()> {
            match index {
                0 => crate::rt::encode(&self.label, out, "label"),
                1 => crate::rt::encode(&self.count, out, "count"),
                _ => Err(crate::rt::unknown_field::<Self>(index)),
            }
        }

        fn decode_text(tokens: &[&str]) -> Result<Self> {
            Ok(Self {
                label: crate::rt::decode_text(tokens, 0, "label")?,
                count: crate::rt::decode_text(tokens, 1, "count")?,
            })
        }

        fn decode_bytes(tokens: &[&[u8]]) -> Result<Self> {
            Ok(Self {
                label: crate::rt::decode_bytes(tokens, 0, "label")?,
                count: crate::rt::decode_bytes(tokens, 1, "count")?,
            })
        }
    }

    fn schema() -> Schema {
        Schema::from_descriptors("Pair", Pair::FIELDS)
    }

    fn pair(label: &str, count: i64) -> Pair {
        Pair { label: label.into(), count }
    }

    #[test]
    fn encoding_follows_column_order_without_trailing_delimiter() {
        let mut line = String::new();
        encode_row(&pair("north", 7), &schema(), &RowcodeOptions::default(), &mut line)
            .expect("encodable");
        assert_eq!(line, "7,north");
        assert!(!line.ends_with(','));
    }

    #[test]
    fn text_and_byte_decoders_agree() {
        let options = RowcodeOptions::default().with_delimiter('|');
        let from_text: Pair = decode_row_str("7|north", &schema(), &options).expect("valid");
        let from_bytes: Pair = decode_row_bytes(b"7|north", &schema(), &options).expect("valid");
        assert_eq!(from_text, pair("north", 7));
        assert_eq!(from_bytes, from_text);
    }

    #[test]
    fn multibyte_delimiters_split_on_both_paths() {
        let options = RowcodeOptions::default().with_delimiter('¦');
        let mut line = String::new();
        encode_row(&pair("ß", -1), &schema(), &options, &mut line).expect("encodable");
        assert_eq!(line, "-1¦ß");
        let decoded: Pair = decode_row_bytes(line.as_bytes(), &schema(), &options).expect("valid");
        assert_eq!(decoded, pair("ß", -1));
    }

    #[test]
    fn wrong_column_counts_are_conversion_errors() {
        let options = RowcodeOptions::default();
        let short = decode_row_str::<Pair>("7", &schema(), &options).unwrap_err();
        assert!(short.to_string().contains("expected 2 columns"));
        let long = decode_row_bytes::<Pair>(b"7,north,", &schema(), &options).unwrap_err();
        assert!(long.to_string().contains("found 3"));
    }

    #[test]
    fn empty_last_token_is_a_value_not_a_terminator() {
        let decoded: Pair =
            decode_row_str("7,", &schema(), &RowcodeOptions::default()).expect("empty string");
        assert_eq!(decoded, pair("", 7));
    }

    #[test]
    fn bad_tokens_abort_the_row() {
        let err = decode_row_str::<Pair>("seven,north", &schema(), &RowcodeOptions::default())
            .unwrap_err();
        assert!(err.is_conversion());
        assert!(err.to_string().contains("`count`"));
    }

    /// Generic kind in column 1, nested kind in column 2. Never constructed.
    #[allow(dead_code)]
    #[derive(Debug)]
    struct Mixed;

    impl Record for Mixed {
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor { name: "nested", column: 2, kind: FieldKind::Nested },
            FieldDescriptor { name: "generic", column: 1, kind: FieldKind::Generic },
        ];

        fn encode_field(&self, index: usize, _out: &mut String) -> Result<()> {
            Err(crate::rt::unknown_field::<Self>(index))
        }

        fn decode_text(_tokens: &[&str]) -> Result<Self> {
            Err(RowcodeError::Internal("column checks should fail first".into()))
        }

        fn decode_bytes(_tokens: &[&[u8]]) -> Result<Self> {
            Err(RowcodeError::Internal("column checks should fail first".into()))
        }
    }

    #[test]
    fn byte_path_rejects_generic_kinds_at_their_column() {
        let schema = Schema::from_descriptors("Mixed", Mixed::FIELDS);
        let options = RowcodeOptions::default();

        let err = decode_row_bytes::<Mixed>(b"7,x", &schema, &options).unwrap_err();
        assert!(err.is_conversion(), "{err}");
        assert!(err.to_string().contains("`generic`"), "{err}");

        // Too few tokens: the generic column is still reported, not the count.
        let err = decode_row_bytes::<Mixed>(b"7", &schema, &options).unwrap_err();
        assert!(err.to_string().contains("cannot be decoded from bytes"), "{err}");

        // The text path accepts column 1 and stops at the nested column 2.
        let err = decode_row_str::<Mixed>("7,x", &schema, &options).unwrap_err();
        assert!(err.is_schema(), "{err}");
    }

    #[test]
    fn byte_tokens_handle_edges() {
        let tokens: Vec<&[u8]> = ByteTokens::new(b",a,,b,", b",").collect();
        assert_eq!(tokens, [&b""[..], b"a", b"", b"b", b""]);
        let tokens: Vec<&[u8]> = ByteTokens::new(b"a::b", b"::").collect();
        assert_eq!(tokens, [&b"a"[..], b"b"]);
        assert_eq!(ByteTokens::new(b"", b",").count(), 1);
    }
}
