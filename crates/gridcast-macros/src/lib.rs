//! Proc macros for Gridcast.
//!
//! # Available Macros
//!
//! - [`Exportable`] - Generate the attribute lookup table a record type needs
//!   to be projected onto columns
//!
//! For working examples, see `gridcast/tests/exportable_derive.rs`.

mod exportable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Exportable` trait for record structs.
///
/// Every named field becomes an attribute a column format can refer to.
/// Lookup is exact and case-sensitive; properties are consulted before
/// fields, so a property can stand in for a field of the same name.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `rename = "..."` | Exported name (default: the field name) |
/// | `skip` | Hide this field from column lookup |
/// | `display` | Read the field through its `Display` impl |
///
/// Without `display`, fields are read as `IntoCellValue::into_cell_value(&self.field)`,
/// which covers strings, numbers, `bool`, `char` and `Option`s of those.
///
/// # Container Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `property(name = "...", method = ident)` | Method-backed attribute; repeatable |
///
/// The method takes `&self` and returns anything implementing `IntoCellValue`.
///
/// # Generated Code
///
/// 1. Name constants (e.g., `Person::NAME`, `Person::AGE`). Names that differ
///    only in case share one constant, which holds the first of them
///    (properties come first)
/// 2. Implementation of `Exportable::find_field` / `read_field`, and of
///    `find_property` / `read_property` when properties are declared
///
/// # Example
///
/// ```ignore
/// use gridcast::{to_html, Exportable};
///
/// #[derive(Exportable)]
/// #[export(property(name = "Initials", method = initials))]
/// struct Person {
///     #[export(rename = "Name")]
///     name: String,
///
///     #[export(rename = "Age")]
///     age: u8,
///
///     #[export(display, rename = "Joined")]
///     joined: Date,
///
///     #[export(skip)]
///     password_hash: String,
/// }
///
/// impl Person {
///     fn initials(&self) -> String {
///         self.name.split(' ').filter_map(|w| w.chars().next()).collect()
///     }
/// }
///
/// let html = to_html(&people, "Name;Initials;Age:0:80")?;
/// ```
#[proc_macro_derive(Exportable, attributes(export))]
pub fn exportable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    exportable::exportable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
