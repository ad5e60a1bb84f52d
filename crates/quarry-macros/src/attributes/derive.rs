//! Implementation of the `#[derive(Attributes)]` macro.
//!
//! This macro generates implementations of both `quarry::Attributes` (value
//! lookup on an instance) and `quarry::Describe` (type lookup without one).

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_container_attrs, parse_field_attrs};

/// Main implementation of the Attributes derive macro.
pub fn attributes_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let container = parse_container_attrs(&input.attrs)?;

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Attributes can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Attributes can only be derived for structs",
            ))
        }
    };

    let target_name = container
        .name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());

    let mut value_arms: Vec<TokenStream> = Vec::new();
    let mut type_arms: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let field_ty = &field.ty;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let attribute_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if seen.contains(&attribute_name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate quarry attribute name '{attribute_name}'"),
            ));
        }
        seen.push(attribute_name.clone());

        if attrs.opaque {
            value_arms.push(quote! {
                #attribute_name => ::core::option::Option::Some(
                    ::quarry::Value::opaque(&self.#field_name)
                ),
            });
            type_arms.push(quote! {
                #attribute_name => ::core::option::Option::Some(
                    ::quarry::ValueType::Other(::core::any::type_name::<#field_ty>())
                ),
            });
        } else {
            value_arms.push(quote! {
                #attribute_name => ::core::option::Option::Some(
                    ::quarry::IntoValue::into_value(&self.#field_name)
                ),
            });
            type_arms.push(quote! {
                #attribute_name => ::core::option::Option::Some(
                    <#field_ty as ::quarry::Typed>::value_type()
                ),
            });
        }
    }

    // Accessors fall back to the trait defaults when none are registered
    let (accessor_fn, accessor_type_fn) = if container.accessors.is_empty() {
        (TokenStream::new(), TokenStream::new())
    } else {
        let names: Vec<String> = container
            .accessors
            .iter()
            .map(|a| a.method.to_string())
            .collect();
        let methods = container.accessors.iter().map(|a| &a.method);
        let types = container.accessors.iter().map(|a| &a.ty);
        (
            quote! {
                fn accessor(&self, name: &str) -> ::core::option::Option<::quarry::Value<'_>> {
                    match name {
                        #(#names => ::core::option::Option::Some(
                            ::quarry::IntoValue::into_value(self.#methods())
                        ),)*
                        _ => ::core::option::Option::None,
                    }
                }
            },
            quote! {
                fn accessor_type(name: &str) -> ::core::option::Option<::quarry::ValueType> {
                    match name {
                        #(#names => ::core::option::Option::Some(
                            <#types as ::quarry::Typed>::value_type()
                        ),)*
                        _ => ::core::option::Option::None,
                    }
                }
            },
        )
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::quarry::Attributes for #struct_name #ty_generics #where_clause {
            fn target_name(&self) -> &'static str {
                #target_name
            }

            fn field(&self, name: &str) -> ::core::option::Option<::quarry::Value<'_>> {
                match name {
                    #(#value_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #accessor_fn
        }

        impl #impl_generics ::quarry::Describe for #struct_name #ty_generics #where_clause {
            fn type_name() -> &'static str {
                #target_name
            }

            fn field_type(name: &str) -> ::core::option::Option<::quarry::ValueType> {
                match name {
                    #(#type_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #accessor_type_fn
        }
    };

    Ok(expanded)
}
