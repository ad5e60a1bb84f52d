//! Attribute parsing for the Attributes derive macro.
//!
//! This module provides parsers for the `#[quarry(...)]` attributes, both
//! on fields and on the struct itself.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream, Parser},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token, Type,
};

/// Field-level attributes from `#[quarry(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    /// Hide this field from conditions and orderings.
    pub skip: bool,
    /// Expose the field as an opaque value of its type name.
    pub opaque: bool,
    /// Custom attribute name (default: field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            skip: false,
            opaque: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl FieldAttr {
    fn merge(&mut self, other: FieldAttr) {
        self.skip |= other.skip;
        self.opaque |= other.opaque;
        if other.rename.is_some() {
            self.rename = other.rename;
        }
        self.span = other.span;
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr {
            span: input.span(),
            ..FieldAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("opaque") => attr.opaque = true,
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_value(&nv.value, "rename")?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown quarry field attribute. Expected: skip, opaque, or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && (attr.opaque || attr.rename.is_some()) {
            return Err(Error::new(
                attr.span,
                "skip cannot be combined with opaque or rename",
            ));
        }

        Ok(attr)
    }
}

/// A zero-argument method registered as an accessor:
/// `name: ReturnType`.
#[derive(Debug, Clone)]
pub struct AccessorSpec {
    pub method: Ident,
    pub ty: Type,
}

impl Parse for AccessorSpec {
    fn parse(input: ParseStream) -> Result<Self> {
        let method: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;
        Ok(AccessorSpec { method, ty })
    }
}

/// Struct-level attributes from `#[quarry(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    /// Target name reported in diagnostics (default: struct name).
    pub name: Option<String>,
    /// Accessors, in declaration order.
    pub accessors: Vec<AccessorSpec>,
}

impl ContainerAttr {
    fn merge(&mut self, other: ContainerAttr) {
        if other.name.is_some() {
            self.name = other.name;
        }
        self.accessors.extend(other.accessors);
    }
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    attr.name = Some(string_value(&nv.value, "name")?);
                }
                Meta::List(list) if list.path.is_ident("accessors") => {
                    let specs = Punctuated::<AccessorSpec, Token![,]>::parse_terminated
                        .parse2(list.tokens.clone())?;
                    attr.accessors.extend(specs);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown quarry attribute. Expected: name = \"...\" or accessors(method: Type, ...)",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

fn string_value(expr: &syn::Expr, key: &str) -> Result<String> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        _ => Err(Error::new(
            expr.span(),
            format!("{key} must be a string literal"),
        )),
    }
}

/// Extract and merge `#[quarry(...)]` attributes from a field.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in attrs {
        if attr.path().is_ident("quarry") {
            merged.merge(attr.parse_args::<FieldAttr>()?);
        }
    }
    Ok(merged)
}

/// Extract and merge `#[quarry(...)]` attributes from the struct.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    let mut merged = ContainerAttr::default();
    for attr in attrs {
        if attr.path().is_ident("quarry") {
            merged.merge(attr.parse_args::<ContainerAttr>()?);
        }
    }
    Ok(merged)
}
