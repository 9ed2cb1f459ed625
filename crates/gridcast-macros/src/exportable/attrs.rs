//! Attribute parsing for the Exportable derive macro.
//!
//! Field attributes: `#[export(rename = "...")]`, `#[export(skip)]`,
//! `#[export(display)]`.
//!
//! Container attributes: `#[export(property(name = "...", method = path))]`,
//! repeatable.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, ExprPath, Lit, Meta, MetaNameValue, Path, Result, Token,
};

/// Field-level attributes from `#[export(...)]`.
#[derive(Debug, Clone, Default)]
pub struct FieldAttr {
    /// Exclude this field from lookup.
    pub skip: bool,
    /// Read the field through `Display` instead of `IntoCellValue`.
    pub display: bool,
    /// Exported name (default: the field name).
    pub rename: Option<String>,
}

fn string_value(nv: &MetaNameValue, what: &str) -> Result<(String, Span)> {
    match &nv.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok((s.value(), s.span())),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("display") => attr.display = true,

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    let (name, span) = string_value(nv, "rename")?;
                    if name.is_empty() {
                        return Err(Error::new(span, "rename must not be empty"));
                    }
                    attr.rename = Some(name);
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown export attribute. Expected: skip, display, or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// A method-backed property declared on the container.
#[derive(Clone)]
pub struct PropertyAttr {
    /// Exported name.
    pub name: String,
    /// Method called with `&self`.
    pub method: Path,
    /// The span for error reporting.
    pub span: Span,
}

impl Parse for PropertyAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let span = input.span();
        let content: Punctuated<MetaNameValue, Token![,]> = Punctuated::parse_terminated(input)?;

        let mut name = None;
        let mut method = None;

        for nv in content {
            if nv.path.is_ident("name") {
                let (value, value_span) = string_value(&nv, "name")?;
                if value.is_empty() {
                    return Err(Error::new(value_span, "property name must not be empty"));
                }
                name = Some(value);
            } else if nv.path.is_ident("method") {
                match nv.value {
                    Expr::Path(ExprPath { path, .. }) => method = Some(path),
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => method = Some(s.parse::<Path>()?),
                    other => {
                        return Err(Error::new(
                            other.span(),
                            "method must be a method name, e.g. method = full_name",
                        ))
                    }
                }
            } else {
                return Err(Error::new(
                    nv.path.span(),
                    "unknown property attribute. Expected: name or method",
                ));
            }
        }

        let name = name.ok_or_else(|| Error::new(span, "property requires name = \"...\""))?;
        let method = method.ok_or_else(|| Error::new(span, "property requires method = ..."))?;

        Ok(PropertyAttr { name, method, span })
    }
}

/// Container-level attributes from `#[export(...)]`.
#[derive(Clone, Default)]
pub struct ContainerAttr {
    /// Declared properties, in declaration order.
    pub properties: Vec<PropertyAttr>,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::List(list) if list.path.is_ident("property") => {
                    attr.properties.push(list.parse_args::<PropertyAttr>()?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown container attribute. Expected: property(name = \"...\", method = ...)",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[export(...)]` attributes from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("export") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

/// Collect every container-level `#[export(...)]` attribute.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    let mut container = ContainerAttr::default();
    for attr in attrs {
        if attr.path().is_ident("export") {
            let parsed = attr.parse_args::<ContainerAttr>()?;
            container.properties.extend(parsed.properties);
        }
    }
    Ok(container)
}
