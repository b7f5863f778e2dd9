//! Derive macro for ModelDefinition
//!
//! Turns `#[model(...)]` options into a `ModelOptions` builder chain.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::attributes;
use crate::utils;

pub fn derive_model_definition(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let parsed = attributes::parse_model_attributes(&input.attrs)?;

    let entity = match &parsed.entity {
        Some(ty) => quote! { #ty },
        None => quote! { ::lifeboat::Record },
    };

    let schema = parsed
        .schema
        .clone()
        .unwrap_or_else(|| utils::snake_case(&name.to_string()));

    let mut chain = vec![quote! { .schema(#schema) }];
    if let Some(schema_id) = &parsed.schema_id {
        chain.push(quote! { .schema_id(#schema_id) });
    }
    if let Some(field) = &parsed.created_field {
        chain.push(quote! { .created_field(#field) });
    }
    if let Some(field) = &parsed.updated_field {
        chain.push(quote! { .updated_field(#field) });
    }
    if let Some(field) = &parsed.deleted_field {
        chain.push(quote! { .deleted_field(#field) });
    }
    if parsed.soft_deletes {
        chain.push(quote! { .soft_deletes(true) });
    }
    if let Some(format) = &parsed.timestamp_format {
        chain.push(quote! { .timestamp_format(#format) });
    }
    if let Some(dsn) = &parsed.connection {
        chain.push(quote! { .credentials(::lifeboat::Credentials::new(#dsn)) });
    }
    if let Some(flag) = parsed.writable {
        chain.push(quote! { .writable(#flag) });
    }
    if let Some(flag) = parsed.readable {
        chain.push(quote! { .readable(#flag) });
    }
    if let Some(flag) = parsed.updatable {
        chain.push(quote! { .updatable(#flag) });
    }
    if let Some(flag) = parsed.deletable {
        chain.push(quote! { .deletable(#flag) });
    }

    Ok(quote! {
        impl #impl_generics ::lifeboat::ModelDefinition for #name #ty_generics #where_clause {
            type Entity = #entity;

            fn options() -> ::lifeboat::ModelOptions {
                ::lifeboat::ModelOptions::new()
                    #(#chain)*
            }
        }
    })
}
