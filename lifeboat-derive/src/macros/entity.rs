//! Derive macro for Entity
//!
//! Locates the `AttributeContainer` field and implements the container
//! plumbing of `lifeboat::Entity` around it.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Index, Member};

use crate::attributes;

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Entity can only be derived for structs",
            ))
        }
    };

    // Marker wins over type detection
    let mut marked = Vec::new();
    let mut typed = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        if attributes::is_marked_container(field)? {
            marked.push(index);
        } else if attributes::is_container_type(field) {
            typed.push(index);
        }
    }
    let candidates = if marked.is_empty() { typed } else { marked };
    let container_index = match candidates.as_slice() {
        [index] => *index,
        [] => {
            return Err(syn::Error::new_spanned(
                name,
                "Entity requires one AttributeContainer field",
            ))
        }
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "multiple AttributeContainer fields; mark one with #[entity(container)]",
            ))
        }
    };

    let member = |index: usize| -> Member {
        match fields.iter().nth(index).and_then(|f| f.ident.clone()) {
            Some(ident) => Member::Named(ident),
            None => Member::Unnamed(Index::from(index)),
        }
    };
    let container_member = member(container_index);

    let inits = (0..fields.len()).map(|index| {
        let field_member = member(index);
        if index == container_index {
            quote! { #field_member: container }
        } else {
            quote! { #field_member: ::core::default::Default::default() }
        }
    });
    // Brace syntax also covers tuple structs (`Self { 0: container }`)
    let construct = quote! { Self { #(#inits),* } };

    let accessors = match attributes::extract_accessors_path(&input.attrs)? {
        Some(path) => quote! {
            fn accessors() -> ::core::option::Option<&'static ::lifeboat::Accessors<Self>> {
                ::core::option::Option::Some(#path())
            }
        },
        None => quote! {},
    };

    Ok(quote! {
        impl #impl_generics ::lifeboat::Entity for #name #ty_generics #where_clause {
            fn from_container(container: ::lifeboat::AttributeContainer) -> Self {
                #construct
            }

            fn container(&self) -> &::lifeboat::AttributeContainer {
                &self.#container_member
            }

            fn container_mut(&mut self) -> &mut ::lifeboat::AttributeContainer {
                &mut self.#container_member
            }

            #accessors
        }
    })
}
