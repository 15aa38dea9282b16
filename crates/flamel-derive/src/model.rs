//! Model derive macro implementation
//!
//! - `attrs`: struct and field attribute parsing

mod attrs;

use crate::common::syn_types::{infer_column_type, option_inner};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Model cannot be derived for generic structs",
        ));
    }

    let name = &input.ident;
    let table = attrs::get_table_name(&input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let mut column_exprs = Vec::with_capacity(fields.len());
    let mut value_exprs = Vec::with_capacity(fields.len());

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let attr = attrs::get_field_attr(field)?;
        let column = attr.column.clone().unwrap_or_else(|| field_ident.to_string());

        let nullable = option_inner(&field.ty).is_some();
        let base_ty = option_inner(&field.ty).unwrap_or(&field.ty);

        let mut expr = match &attr.sql_type {
            Some(sql_type) => quote! {
                ::flamel::Column::of_type_name(#column, #sql_type)
            },
            None => {
                let Some(variant) = infer_column_type(base_ty) else {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "cannot infer a column type; add #[orm(sql_type = \"...\")]",
                    ));
                };
                let variant = syn::Ident::new(variant, Span::call_site());
                quote! {
                    ::flamel::Column::new(#column, ::flamel::ColumnType::#variant)
                }
            }
        };

        // Primary keys are left nullable so an autoincrement key can be unset.
        if !nullable && !attr.primary_key {
            expr = quote! { #expr.not_null() };
        }
        if let Some(default) = &attr.default {
            expr = quote! { #expr.default(#default) };
        }
        if attr.default_now {
            expr = quote! { #expr.default_now() };
        }
        if attr.unique {
            expr = quote! { #expr.unique() };
        }
        if let Some(check) = &attr.check {
            expr = quote! { #expr.check(#check) };
        }
        if attr.primary_key {
            expr = quote! { #expr.primary_key() };
        }
        if attr.autoincrement {
            expr = quote! { #expr.autoincrement() };
        }
        if let Some(fk) = &attr.foreign_key {
            let (fk_table, fk_column) = (&fk.table, &fk.column);
            expr = quote! { #expr.references(#fk_table, #fk_column) };
        }

        column_exprs.push(expr);
        value_exprs.push(quote! {
            (#column, ::flamel::Value::from(::std::clone::Clone::clone(&self.#field_ident)))
        });
    }

    Ok(quote! {
        impl ::flamel::Model for #name {
            const MODEL_NAME: &'static str = #table;

            fn declare() -> ::flamel::OrmResult<::flamel::ModelDef> {
                ::flamel::ModelDef::builder(#table)
                    #(.column(#column_exprs))*
                    .build()
            }

            fn values(&self) -> ::std::vec::Vec<(&'static str, ::flamel::Value)> {
                ::std::vec![#(#value_exprs),*]
            }
        }

        ::flamel::inventory::submit! {
            ::flamel::ModelRegistration {
                declare: <#name as ::flamel::Model>::declare,
            }
        }
    })
}
