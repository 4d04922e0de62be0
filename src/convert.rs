//! The type conversion layer.
//!
//! Every participating field type implements [`ColumnType`], which renders a value to its token
//! and parses a token back. The fixed table of kinds is:
//!
//! | Kind | Rust type | Token |
//! |---|---|---|
//! | Bool | `bool` | `true` / `false` |
//! | String | `String` | raw UTF-8, unescaped |
//! | Int32 | `i32` | decimal ASCII |
//! | Int64 | `i64` | decimal ASCII |
//! | Float64 | `f64` | shortest round-trip decimal |
//! | Uuid | `uuid::Uuid` | 36-character hyphenated hex |
//! | Timestamp | [`Timestamp`] | decimal tick count |
//!
//! Any other scalar goes through a single generic fallback: `Display` to encode, `FromStr` to
//! decode on the text path. The byte path has no fallback and rejects such kinds outright.
//! Nested kinds (`Vec<T>`, `Box<T>`, derived records) fail with a schema error on every call.
//!
//! Non-finite doubles encode as `NaN`, `inf` and `-inf`, which parse back to the same class.

use std::fmt::{Display, Write};
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{Result, RowcodeError};
use crate::schema::FieldKind;
use crate::timestamp::Timestamp;

/// Length of the canonical hyphenated UUID form.
const UUID_HYPHENATED_LEN: usize = 36;

/// A field type that can occupy one column of a row.
///
/// Implemented for the scalar kinds listed in the module docs. `#[derive(RowcodeRecord)]`
/// implements it for the record itself with [`FieldKind::Nested`], and [`generic_column!`]
/// registers user types for the generic fallback.
///
/// [`generic_column!`]: crate::generic_column
pub trait ColumnType: Sized {
    /// The kind reported to the schema resolver.
    const KIND: FieldKind;

    /// Appends the token for `self` to `out`.
    fn encode(&self, out: &mut String) -> Result<()>;

    /// Parses a token from the text path.
    fn decode_str(token: &str) -> Result<Self>;

    /// Parses a token from the byte path.
    fn decode_bytes(token: &[u8]) -> Result<Self>;
}

/// Renders any `Display` value into `out`.
pub fn encode_display<T: Display + ?Sized>(value: &T, out: &mut String) -> Result<()> {
    write!(out, "{value}").map_err(|e| RowcodeError::Conversion(format!("cannot render value: {e}")))
}

/// The generic string round-trip used by the text path for kinds outside the fixed table.
pub fn decode_generic<T>(token: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    token.parse::<T>().map_err(|e| {
        RowcodeError::Conversion(format!(
            "cannot convert `{token}` to {}: {e}",
            std::any::type_name::<T>()
        ))
    })
}

/// Byte-path rejection for kinds outside the fixed table.
pub fn unsupported_on_bytes<T>() -> RowcodeError {
    RowcodeError::Conversion(format!(
        "{} has no byte-path conversion",
        std::any::type_name::<T>()
    ))
}

/// Schema failure for nested kinds.
pub fn nested_kind<T>() -> RowcodeError {
    RowcodeError::Schema(format!(
        "{} is a nested type; only flat scalar fields can be mapped to columns",
        std::any::type_name::<T>()
    ))
}

fn utf8(token: &[u8]) -> Result<&str> {
    std::str::from_utf8(token)
        .map_err(|e| RowcodeError::Conversion(format!("token is not valid UTF-8: {e}")))
}

fn parse_number<T>(token: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    token.parse::<T>().map_err(|e| {
        RowcodeError::Conversion(format!(
            "invalid {} `{token}`: {e}",
            std::any::type_name::<T>()
        ))
    })
}

fn parse_bool(token: &str) -> Result<bool> {
    if token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(RowcodeError::Conversion(format!(
            "invalid boolean `{token}`: expected `true` or `false`"
        )))
    }
}

fn parse_uuid(token: &[u8]) -> Result<Uuid> {
    let invalid = |detail: String| {
        RowcodeError::Conversion(format!(
            "invalid UUID `{}`: {detail}",
            String::from_utf8_lossy(token)
        ))
    };
    if token.len() != UUID_HYPHENATED_LEN {
        return Err(invalid(format!(
            "expected {UUID_HYPHENATED_LEN} characters in hyphenated form"
        )));
    }
    Uuid::try_parse_ascii(token).map_err(|e| invalid(e.to_string()))
}

impl ColumnType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn encode(&self, out: &mut String) -> Result<()> {
        out.push_str(if *self { "true" } else { "false" });
        Ok(())
    }

    fn decode_str(token: &str) -> Result<Self> {
        parse_bool(token)
    }

    fn decode_bytes(token: &[u8]) -> Result<Self> {
        parse_bool(utf8(token)?)
    }
}

impl ColumnType for String {
    const KIND: FieldKind = FieldKind::String;

    fn encode(&self, out: &mut String) -> Result<()> {
        out.push_str(self);
        Ok(())
    }

    fn decode_str(token: &str) -> Result<Self> {
        Ok(token.to_owned())
    }

    fn decode_bytes(token: &[u8]) -> Result<Self> {
        utf8(token).map(str::to_owned)
    }
}

macro_rules! impl_numeric_column {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl ColumnType for $t {
                const KIND: FieldKind = FieldKind::$kind;

                fn encode(&self, out: &mut String) -> Result<()> {
                    encode_display(self, out)
                }

                fn decode_str(token: &str) -> Result<Self> {
                    parse_number(token)
                }

                fn decode_bytes(token: &[u8]) -> Result<Self> {
                    parse_number(utf8(token)?)
                }
            }
        )*
    };
}

impl_numeric_column!(i32 => Int32, i64 => Int64, f64 => Float64);

impl ColumnType for Uuid {
    const KIND: FieldKind = FieldKind::Uuid;

    fn encode(&self, out: &mut String) -> Result<()> {
        let mut buf = Uuid::encode_buffer();
        out.push_str(self.hyphenated().encode_lower(&mut buf));
        Ok(())
    }

    fn decode_str(token: &str) -> Result<Self> {
        parse_uuid(token.as_bytes())
    }

    fn decode_bytes(token: &[u8]) -> Result<Self> {
        parse_uuid(token)
    }
}

impl ColumnType for Timestamp {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn encode(&self, out: &mut String) -> Result<()> {
        encode_display(&self.ticks(), out)
    }

    fn decode_str(token: &str) -> Result<Self> {
        Timestamp::from_ticks(parse_number(token)?)
    }

    fn decode_bytes(token: &[u8]) -> Result<Self> {
        Timestamp::from_ticks(parse_number(utf8(token)?)?)
    }
}

/// Registers types for the generic conversion fallback.
///
/// The types must implement `Display` and `FromStr` (with a `Display` error). They encode on
/// both paths but decode only from text; byte-path decodes fail with a conversion error.
///
/// ```rust
/// use std::fmt;
/// use std::str::FromStr;
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(i16);
///
/// impl fmt::Display for Celsius {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}C", self.0)
///     }
/// }
///
/// impl FromStr for Celsius {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.trim_end_matches('C').parse().map(Celsius)
///     }
/// }
///
/// rowcode::generic_column!(Celsius);
/// ```
#[macro_export]
macro_rules! generic_column {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::ColumnType for $t {
                const KIND: $crate::schema::FieldKind = $crate::schema::FieldKind::Generic;

                fn encode(&self, out: &mut ::std::string::String) -> $crate::Result<()> {
                    $crate::convert::encode_display(self, out)
                }

                fn decode_str(token: &str) -> $crate::Result<Self> {
                    $crate::convert::decode_generic(token)
                }

                fn decode_bytes(_token: &[u8]) -> $crate::Result<Self> {
                    ::std::result::Result::Err($crate::convert::unsupported_on_bytes::<Self>())
                }
            }
        )*
    };
}

generic_column!(u8, u16, u32, u64, u128, usize, i8, i16, i128, isize, f32, char);

macro_rules! impl_nested_column {
    ($($t:ident),*) => {
        $(
            impl<T> ColumnType for $t<T> {
                const KIND: FieldKind = FieldKind::Nested;

                fn encode(&self, _out: &mut String) -> Result<()> {
                    Err(nested_kind::<Self>())
                }

                fn decode_str(_token: &str) -> Result<Self> {
                    Err(nested_kind::<Self>())
                }

                fn decode_bytes(_token: &[u8]) -> Result<Self> {
                    Err(nested_kind::<Self>())
                }
            }
        )*
    };
}

impl_nested_column!(Vec, Box);
