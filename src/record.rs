//! Defines the `Record` trait: the static field table of a flat, fixed-shape struct.
//!
//! This is the registration-time replacement for runtime field inspection. The derive macro
//! writes one match arm per participating field, so the codec never inspects types per row.

use crate::error::Result;
use crate::schema::FieldDescriptor;

/// A struct whose annotated fields map to columns of a delimited line.
///
/// Implemented by `#[derive(RowcodeRecord)]`. Hand-written implementations must keep the three
/// methods consistent with [`Record::FIELDS`]: index `i` everywhere refers to `FIELDS[i]`.
///
/// Decoding builds the value in one struct expression from the token slice, so a partially
/// populated record never exists.
pub trait Record: Sized + 'static {
    /// Participating fields in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// Appends the token of field `index` to `out`.
    fn encode_field(&self, index: usize, out: &mut String) -> Result<()>;

    /// Builds a record from text tokens indexed by declaration position.
    fn decode_text(tokens: &[&str]) -> Result<Self>;

    /// Builds a record from byte tokens indexed by declaration position.
    fn decode_bytes(tokens: &[&[u8]]) -> Result<Self>;
}
