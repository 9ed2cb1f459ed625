//! Implementation of the `#[derive(Exportable)]` macro.
//!
//! This macro generates an implementation of the `Exportable` trait: a
//! name-to-slot lookup for properties and fields, the matching readers, and
//! one name constant per exported attribute.

use std::collections::{BTreeMap, HashSet};

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_container_attrs, parse_field_attrs};

/// Main implementation of the Exportable derive macro.
pub fn exportable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Exportable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Exportable can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    // Constant ident -> exported name, shared by properties and fields.
    let mut constants: BTreeMap<String, String> = BTreeMap::new();

    let mut property_lookups: Vec<TokenStream> = Vec::new();
    let mut property_reads: Vec<TokenStream> = Vec::new();
    let mut seen_properties: HashSet<String> = HashSet::new();

    for (slot, property) in container.properties.iter().enumerate() {
        if !seen_properties.insert(property.name.clone()) {
            return Err(Error::new(
                property.span,
                format!("duplicate property name '{}'", property.name),
            ));
        }
        register_constant(&mut constants, &property.name);

        let name = &property.name;
        let method = &property.method;
        property_lookups.push(quote! {
            #name => ::core::option::Option::Some(#slot),
        });
        property_reads.push(quote! {
            #slot => ::gridcast::IntoCellValue::into_cell_value(self.#method()),
        });
    }

    let mut field_lookups: Vec<TokenStream> = Vec::new();
    let mut field_reads: Vec<TokenStream> = Vec::new();
    let mut seen_fields: HashSet<String> = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;

        // Skip if marked with #[export(skip)]
        if attrs.skip {
            continue;
        }

        // Raw identifiers export without their prefix.
        let name = attrs.rename.unwrap_or_else(|| {
            let raw = field_name.to_string();
            raw.strip_prefix("r#").map(str::to_string).unwrap_or(raw)
        });

        if !seen_fields.insert(name.clone()) {
            return Err(Error::new(
                field.span(),
                format!("duplicate export name '{}'", name),
            ));
        }
        register_constant(&mut constants, &name);

        let slot = field_lookups.len();
        field_lookups.push(quote! {
            #name => ::core::option::Option::Some(#slot),
        });

        let read = if attrs.display {
            quote! {
                ::gridcast::CellValue::Text(::std::borrow::Cow::Owned(
                    ::std::string::ToString::to_string(&self.#field_name)
                ))
            }
        } else {
            quote! { ::gridcast::IntoCellValue::into_cell_value(&self.#field_name) }
        };
        field_reads.push(quote! {
            #slot => #read,
        });
    }

    let field_constants = constants.iter().map(|(ident, name)| {
        let const_name = format_ident!("{}", ident);
        quote! {
            /// Exported attribute name constant.
            pub const #const_name: &'static str = #name;
        }
    });

    // Types without properties keep the trait's defaults.
    let property_impl = if property_lookups.is_empty() {
        quote! {}
    } else {
        quote! {
            fn find_property(name: &str) -> ::core::option::Option<usize> {
                match name {
                    #(#property_lookups)*
                    _ => ::core::option::Option::None,
                }
            }

            fn read_property(&self, slot: usize) -> ::gridcast::CellValue<'_> {
                match slot {
                    #(#property_reads)*
                    _ => ::gridcast::CellValue::Null,
                }
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::gridcast::Exportable for #struct_name #ty_generics #where_clause {
            #property_impl

            fn find_field(name: &str) -> ::core::option::Option<usize> {
                match name {
                    #(#field_lookups)*
                    _ => ::core::option::Option::None,
                }
            }

            fn read_field(&self, slot: usize) -> ::gridcast::CellValue<'_> {
                match slot {
                    #(#field_reads)*
                    _ => ::gridcast::CellValue::Null,
                }
            }
        }
    };

    Ok(expanded)
}

/// Records the constant for `name`.
///
/// Lookup is case-sensitive, so `Age` and `age` are distinct attributes that
/// share the constant `AGE`. The first name registered keeps it; properties
/// register before fields.
fn register_constant(constants: &mut BTreeMap<String, String>, name: &str) {
    constants
        .entry(to_constant_ident(name))
        .or_insert_with(|| name.to_string());
}

/// Convert an export name to a valid SCREAMING_SNAKE_CASE identifier.
fn to_constant_ident(s: &str) -> String {
    let mut result = to_screaming_snake_case(s);
    if result.trim_matches('_').is_empty() {
        result.insert_str(0, "ATTR");
    } else if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c.is_alphanumeric() && c.is_ascii() {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_ascii_lowercase();
        } else {
            // Separators and anything not valid in an identifier.
            if !result.ends_with('_') {
                result.push('_');
            }
            prev_was_lower = false;
        }
    }

    result
}
