//! Schema discovery: which fields of a record are columns, and in what order.
//!
//! `#[derive(RowcodeRecord)]` emits a table of [`FieldDescriptor`]s in declaration order, one per
//! field annotated with `#[rowcode(column = N)]`. The resolver sorts that table by column number
//! and remembers the result for the lifetime of the process, so every later call for the same
//! record type shares one [`Schema`].
//!
//! Columns need not be contiguous. Two fields declaring the same column keep their declaration
//! order (the sort is stable).
//!
//! Kinds are not validated here. A nested field is reported by the row codec when a row reaches
//! its column.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use crate::record::Record;

/// The conversion family a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `true` / `false`.
    Bool,
    /// Raw UTF-8 text.
    String,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Double-precision float.
    Float64,
    /// Hyphenated UUID.
    Uuid,
    /// Tick-count timestamp.
    Timestamp,
    /// Any other scalar, converted through `Display` / `FromStr`.
    Generic,
    /// An aggregate or reference type. Never encodable.
    Nested,
}

impl FieldKind {
    /// False only for [`FieldKind::Nested`].
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Self::Nested)
    }

    /// Kinds with a dedicated byte-path parser.
    pub const fn has_byte_decoder(self) -> bool {
        !matches!(self, Self::Generic | Self::Nested)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Uuid => "uuid",
            Self::Timestamp => "timestamp",
            Self::Generic => "generic",
            Self::Nested => "nested",
        };
        f.write_str(name)
    }
}

/// A participating field as declared on the record, before ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Header label (the field name unless renamed).
    pub name: &'static str,
    /// Declared column number.
    pub column: u32,
    /// Conversion family of the field's type.
    pub kind: FieldKind,
}

/// One column of a resolved schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Declared column number.
    pub column: u32,
    /// Position of the field in the record's descriptor table.
    pub index: usize,
    /// Header label.
    pub name: &'static str,
    /// Conversion family.
    pub kind: FieldKind,
}

/// The ordered list of columns for one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldMapping>,
}

type SchemaCache = RwLock<HashMap<TypeId, Arc<Schema>>>;

fn cache() -> &'static SchemaCache {
    static CACHE: OnceLock<SchemaCache> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

impl Schema {
    /// Orders `descriptors` by column. Pure; does not touch the cache.
    pub fn from_descriptors(type_name: &'static str, descriptors: &[FieldDescriptor]) -> Self {
        let mut fields: Vec<FieldMapping> = descriptors
            .iter()
            .enumerate()
            .map(|(index, d)| FieldMapping {
                column: d.column,
                index,
                name: d.name,
                kind: d.kind,
            })
            .collect();
        fields.sort_by_key(|f| f.column);
        Self { type_name, fields }
    }

    /// Returns the cached schema for `R`, building it on first use.
    pub fn resolve<R: Record>() -> Arc<Self> {
        let key = TypeId::of::<R>();
        {
            let guard = cache().read().unwrap_or_else(|p| p.into_inner());
            if let Some(schema) = guard.get(&key) {
                return Arc::clone(schema);
            }
        }

        let mut guard = cache().write().unwrap_or_else(|p| p.into_inner());
        let schema = guard.entry(key).or_insert_with(|| {
            let type_name = std::any::type_name::<R>();
            tracing::trace!(record = type_name, columns = R::FIELDS.len(), "resolved schema");
            Arc::new(Self::from_descriptors(type_name, R::FIELDS))
        });
        Arc::clone(schema)
    }

    /// Columns in wire order.
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no participating fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fully qualified name of the record type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Column labels joined by `delimiter`.
    pub fn header_line(&self, delimiter: char) -> String {
        let mut line = String::new();
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                line.push(delimiter);
            }
            line.push_str(field.name);
        }
        line
    }
}
