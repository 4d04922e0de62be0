//! Public entry points: whole-buffer, single-row and file operations.

use std::path::Path;

use crate::error::Result;
use crate::format::RowcodeOptions;
use crate::io::{MappedFile, write_file};
use crate::reader::{decode_all_bytes, decode_all_str};
use crate::record::Record;
use crate::row::{decode_row_str, encode_row};
use crate::schema::Schema;
use crate::writer::encode_all;

/// The main entry point for encoding and decoding record collections.
///
/// Every call validates its options, resolves (or reuses) the record's schema and runs to
/// completion on the calling thread; large decodes may additionally fan out onto the rayon pool.
#[derive(Debug)]
pub struct Rowcode;

impl Rowcode {
    /// Starts a fluent configuration.
    pub fn builder() -> RowcodeBuilder {
        RowcodeBuilder::default()
    }

    /// Encodes `records` with the default options (`,` delimiter, no header).
    pub fn serialize<R: Record>(records: &[R]) -> Result<String> {
        Self::serialize_with(records, &RowcodeOptions::default())
    }

    /// Encodes `records` as delimited text.
    pub fn serialize_with<R: Record>(records: &[R], options: &RowcodeOptions) -> Result<String> {
        options.validate()?;
        encode_all(records, &Schema::resolve::<R>(), options)
    }

    /// Encodes `records` as UTF-8 bytes.
    pub fn serialize_to_bytes<R: Record>(records: &[R], options: &RowcodeOptions) -> Result<Vec<u8>> {
        Self::serialize_with(records, options).map(String::into_bytes)
    }

    /// Decodes a text buffer with the default options.
    pub fn deserialize<R: Record + Send>(text: &str) -> Result<Vec<R>> {
        Self::deserialize_with(text, &RowcodeOptions::default())
    }

    /// Decodes a text buffer.
    pub fn deserialize_with<R: Record + Send>(text: &str, options: &RowcodeOptions) -> Result<Vec<R>> {
        options.validate()?;
        decode_all_str(text, &Schema::resolve::<R>(), options)
    }

    /// Decodes a byte buffer. Generic-kind fields are rejected on this path.
    pub fn deserialize_bytes<R: Record + Send>(bytes: &[u8], options: &RowcodeOptions) -> Result<Vec<R>> {
        options.validate()?;
        decode_all_bytes(bytes, &Schema::resolve::<R>(), options)
    }

    /// Encodes a single record as one line.
    pub fn serialize_row<R: Record>(record: &R, options: &RowcodeOptions) -> Result<String> {
        options.validate()?;
        let mut line = String::new();
        encode_row(record, &Schema::resolve::<R>(), options, &mut line)?;
        Ok(line)
    }

    /// Decodes a single line. The line must not contain a terminator.
    pub fn deserialize_row<R: Record>(line: &str, options: &RowcodeOptions) -> Result<R> {
        options.validate()?;
        decode_row_str(line, &Schema::resolve::<R>(), options)
    }

    /// The header line `write_header` would emit for `R`.
    pub fn header<R: Record>(options: &RowcodeOptions) -> Result<String> {
        options.validate()?;
        Ok(Schema::resolve::<R>().header_line(options.delimiter))
    }

    /// Encodes `records` into the file at `path`.
    pub fn save<R, P>(path: P, records: &[R], options: &RowcodeOptions) -> Result<()>
    where
        R: Record,
        P: AsRef<Path>,
    {
        let bytes = Self::serialize_to_bytes(records, options)?;
        write_file(path.as_ref(), &bytes)
    }

    /// Decodes the file at `path` through a memory map and the byte path.
    pub fn load<R, P>(path: P, options: &RowcodeOptions) -> Result<Vec<R>>
    where
        R: Record + Send,
        P: AsRef<Path>,
    {
        options.validate()?;
        let file = MappedFile::open(path.as_ref())?;
        decode_all_bytes(file.bytes(), &Schema::resolve::<R>(), options)
    }
}

/// Fluent wrapper around [`RowcodeOptions`].
///
/// ```rust
/// use rowcode::{Rowcode, RowcodeRecord};
///
/// #[derive(RowcodeRecord, Debug, PartialEq)]
/// struct Point {
///     #[rowcode(column = 1)]
///     x: i32,
///     #[rowcode(column = 2)]
///     y: i32,
/// }
///
/// let codec = Rowcode::builder().delimiter(';').header(true);
/// let text = codec.serialize(&[Point { x: 1, y: 2 }])?;
/// assert_eq!(text, "x;y\n1;2");
/// assert_eq!(codec.deserialize::<Point>(&text)?, vec![Point { x: 1, y: 2 }]);
/// # Ok::<(), rowcode::RowcodeError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RowcodeBuilder {
    options: RowcodeOptions,
}

impl RowcodeBuilder {
    /// Sets the column delimiter.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    /// Writes a header line on encode and skips it on decode.
    pub fn header(mut self, enabled: bool) -> Self {
        self.options.has_header = enabled;
        self.options.write_header = enabled;
        self
    }

    /// Skips the first line on decode without writing one on encode.
    pub fn skip_header(mut self, enabled: bool) -> Self {
        self.options.has_header = enabled;
        self
    }

    /// Enables or disables the parallel decoder.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.options.parallel = enabled;
        self
    }

    /// The accumulated options.
    pub fn options(&self) -> RowcodeOptions {
        self.options
    }

    /// See [`Rowcode::serialize_with`].
    pub fn serialize<R: Record>(&self, records: &[R]) -> Result<String> {
        Rowcode::serialize_with(records, &self.options)
    }

    /// See [`Rowcode::serialize_to_bytes`].
    pub fn serialize_to_bytes<R: Record>(&self, records: &[R]) -> Result<Vec<u8>> {
        Rowcode::serialize_to_bytes(records, &self.options)
    }

    /// See [`Rowcode::deserialize_with`].
    pub fn deserialize<R: Record + Send>(&self, text: &str) -> Result<Vec<R>> {
        Rowcode::deserialize_with(text, &self.options)
    }

    /// See [`Rowcode::deserialize_bytes`].
    pub fn deserialize_bytes<R: Record + Send>(&self, bytes: &[u8]) -> Result<Vec<R>> {
        Rowcode::deserialize_bytes(bytes, &self.options)
    }

    /// See [`Rowcode::save`].
    pub fn save<R: Record, P: AsRef<Path>>(&self, path: P, records: &[R]) -> Result<()> {
        Rowcode::save(path, records, &self.options)
    }

    /// See [`Rowcode::load`].
    pub fn load<R: Record + Send, P: AsRef<Path>>(&self, path: P) -> Result<Vec<R>> {
        Rowcode::load(path, &self.options)
    }
}
