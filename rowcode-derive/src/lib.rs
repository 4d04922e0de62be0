//! # Rowcode Derive Macros
//!
//! This crate provides the procedural macro for `rowcode`. It implements `Record` (the static
//! field table plus encode/decode glue) and marks the struct itself as a nested `ColumnType`.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitInt, LitStr, parse_macro_input};

/// Derives `rowcode::Record` and `rowcode::ColumnType` (nested kind).
///
/// Fields annotated with `#[rowcode(column = N)]` become columns; `name = "..."` overrides the
/// header label. Unannotated fields are skipped on encode and set to `Default::default()` on
/// decode.
#[proc_macro_derive(RowcodeRecord, attributes(rowcode))]
pub fn derive_rowcode_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    if !input.generics.params.is_empty() {
        return syn::Error::new(name.span(), "RowcodeRecord does not support generic structs")
            .to_compile_error()
            .into();
    }

    let named = match input.data {
        Data::Struct(ds) => match ds.fields {
            Fields::Named(named) => named.named,
            _ => {
                return syn::Error::new(
                    name.span(),
                    "RowcodeRecord only supports structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(name.span(), "RowcodeRecord only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let mut columns = Vec::new();
    let mut skipped = Vec::new();

    for field in named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        match parse_attributes(&field.attrs) {
            Ok(Some((column, label))) => columns.push(ColumnField {
                label: label.unwrap_or_else(|| ident.to_string()),
                ident,
                ty: field.ty,
                column,
            }),
            Ok(None) => skipped.push(ident),
            Err(e) => return e.to_compile_error().into(),
        }
    }

    let impl_record = generate_record(&name, &columns, &skipped);
    let impl_column = generate_nested_column(&name);

    let expanded = quote! {
        #impl_record
        #impl_column
    };

    TokenStream::from(expanded)
}

// --- Internal Data Structures ---
struct ColumnField {
    ident: syn::Ident,
    ty: syn::Type,
    column: u32,
    label: String,
}

/// Parses attributes. Returns `Some((column, label))` for participating fields.
fn parse_attributes(attrs: &[Attribute]) -> syn::Result<Option<(u32, Option<String>)>> {
    let mut column = None;
    let mut label = None;
    let mut seen = None;

    for attr in attrs {
        if attr.path().is_ident("rowcode") {
            seen = Some(attr);
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("column") {
                    let value: LitInt = meta.value()?.parse()?;
                    column = Some(value.base10_parse::<u32>()?);
                    return Ok(());
                }

                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    label = Some(value.value());
                    return Ok(());
                }

                Err(meta.error("Unknown rowcode attribute key. Supported: column, name"))
            })?;
        }
    }

    match (seen, column) {
        (None, _) => Ok(None),
        (Some(_), Some(column)) => Ok(Some((column, label))),
        (Some(attr), None) => Err(syn::Error::new_spanned(
            attr,
            "rowcode fields need a column number: #[rowcode(column = N)]",
        )),
    }
}

// --- Generator: Record ---

fn generate_record(
    name: &syn::Ident,
    columns: &[ColumnField],
    skipped: &[syn::Ident],
) -> proc_macro2::TokenStream {
    let descriptors = columns.iter().map(|f| {
        let ty = &f.ty;
        let label = &f.label;
        let column = f.column;
        quote! {
            rowcode::schema::FieldDescriptor {
                name: #label,
                column: #column,
                kind: <#ty as rowcode::ColumnType>::KIND,
            }
        }
    });

    let encode_arms = columns.iter().enumerate().map(|(i, f)| {
        let fname = &f.ident;
        let label = &f.label;
        quote! { #i => rowcode::rt::encode(&self.#fname, out, #label), }
    });

    let decode_text = columns.iter().enumerate().map(|(i, f)| {
        let fname = &f.ident;
        let label = &f.label;
        quote! { #fname: rowcode::rt::decode_text(tokens, #i, #label)?, }
    });

    let decode_bytes = columns.iter().enumerate().map(|(i, f)| {
        let fname = &f.ident;
        let label = &f.label;
        quote! { #fname: rowcode::rt::decode_bytes(tokens, #i, #label)?, }
    });

    let defaults = skipped.iter().map(|fname| {
        quote! { #fname: ::core::default::Default::default(), }
    });
    let defaults_bytes = defaults.clone();

    quote! {
        impl rowcode::Record for #name {
            const FIELDS: &'static [rowcode::schema::FieldDescriptor] = &[
                #(#descriptors),*
            ];

            fn encode_field(&self, index: usize, out: &mut ::std::string::String) -> rowcode::Result<()> {
                match index {
                    #(#encode_arms)*
                    _ => ::core::result::Result::Err(rowcode::rt::unknown_field::<Self>(index)),
                }
            }

            #[allow(unused_variables)]
            fn decode_text(tokens: &[&str]) -> rowcode::Result<Self> {
                ::core::result::Result::Ok(Self {
                    #(#decode_text)*
                    #(#defaults)*
                })
            }

            #[allow(unused_variables)]
            fn decode_bytes(tokens: &[&[u8]]) -> rowcode::Result<Self> {
                ::core::result::Result::Ok(Self {
                    #(#decode_bytes)*
                    #(#defaults_bytes)*
                })
            }
        }
    }
}

// --- Generator: ColumnType (nested) ---

fn generate_nested_column(name: &syn::Ident) -> proc_macro2::TokenStream {
    quote! {
        impl rowcode::ColumnType for #name {
            const KIND: rowcode::FieldKind = rowcode::FieldKind::Nested;

            fn encode(&self, _out: &mut ::std::string::String) -> rowcode::Result<()> {
                ::core::result::Result::Err(rowcode::convert::nested_kind::<Self>())
            }

            fn decode_str(_token: &str) -> rowcode::Result<Self> {
                ::core::result::Result::Err(rowcode::convert::nested_kind::<Self>())
            }

            fn decode_bytes(_token: &[u8]) -> rowcode::Result<Self> {
                ::core::result::Result::Err(rowcode::convert::nested_kind::<Self>())
            }
        }
    }
}
