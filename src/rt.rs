// src/rt.rs

//! Runtime utilities for generated code (Macros).
//! Do not use directly.

use crate::convert::ColumnType;
use crate::error::{Result, RowcodeError};

/// Decodes the text token at `index` into field `name`.
pub fn decode_text<T: ColumnType>(tokens: &[&str], index: usize, name: &str) -> Result<T> {
    let token = tokens.get(index).ok_or_else(|| missing(index, name))?;
    T::decode_str(token).map_err(|e| e.in_field(name))
}

/// Decodes the byte token at `index` into field `name`.
pub fn decode_bytes<T: ColumnType>(tokens: &[&[u8]], index: usize, name: &str) -> Result<T> {
    let token = tokens.get(index).ok_or_else(|| missing(index, name))?;
    T::decode_bytes(token).map_err(|e| e.in_field(name))
}

/// Encodes `value` as field `name`.
pub fn encode<T: ColumnType>(value: &T, out: &mut String, name: &str) -> Result<()> {
    value.encode(out).map_err(|e| e.in_field(name))
}

/// The error for a field index the record does not declare.
pub fn unknown_field<R>(index: usize) -> RowcodeError {
    RowcodeError::Internal(format!(
        "{} has no participating field at index {index}",
        std::any::type_name::<R>()
    ))
}

fn missing(index: usize, name: &str) -> RowcodeError {
    RowcodeError::Internal(format!("no token supplied for field `{name}` (index {index})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_context_is_attached_to_conversion_failures() {
        let err = decode_text::<i32>(&["12", "x"], 1, "count").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conversion Error: field `count`: invalid i32 `x`: invalid digit found in string"
        );
    }

    #[test]
    fn short_token_slices_are_internal_errors() {
        let err = decode_bytes::<i64>(&[b"1".as_slice()], 3, "late").unwrap_err();
        assert!(matches!(err, RowcodeError::Internal(_)));
    }
}
