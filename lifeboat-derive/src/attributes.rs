//! Attribute parsing utilities

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Field, LitBool, LitStr, Path, Type};

/// Options collected from `#[model(...)]` on a model definition.
#[derive(Default)]
pub struct ModelAttributes {
    pub entity: Option<Type>,
    pub schema: Option<String>,
    pub schema_id: Option<String>,
    pub created_field: Option<String>,
    pub updated_field: Option<String>,
    pub deleted_field: Option<String>,
    pub soft_deletes: bool,
    pub timestamp_format: Option<String>,
    pub connection: Option<String>,
    pub writable: Option<bool>,
    pub readable: Option<bool>,
    pub updatable: Option<bool>,
    pub deletable: Option<bool>,
}

fn string_value(meta: &ParseNestedMeta) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

fn bool_value(meta: &ParseNestedMeta) -> syn::Result<bool> {
    let lit: LitBool = meta.value()?.parse()?;
    Ok(lit.value)
}

/// Bare flag (`soft_deletes`) or explicit `soft_deletes = false`.
fn flag_value(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        bool_value(meta)
    } else {
        Ok(true)
    }
}

/// Parse every `#[model(...)]` attribute on the struct.
pub fn parse_model_attributes(attrs: &[Attribute]) -> syn::Result<ModelAttributes> {
    let mut parsed = ModelAttributes::default();
    for attr in attrs {
        if !attr.path().is_ident("model") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let path = &meta.path;
            if path.is_ident("entity") {
                parsed.entity = Some(meta.value()?.parse()?);
            } else if path.is_ident("schema") {
                parsed.schema = Some(string_value(&meta)?);
            } else if path.is_ident("schema_id") {
                parsed.schema_id = Some(string_value(&meta)?);
            } else if path.is_ident("created_field") {
                parsed.created_field = Some(string_value(&meta)?);
            } else if path.is_ident("updated_field") {
                parsed.updated_field = Some(string_value(&meta)?);
            } else if path.is_ident("deleted_field") {
                parsed.deleted_field = Some(string_value(&meta)?);
            } else if path.is_ident("soft_deletes") {
                parsed.soft_deletes = flag_value(&meta)?;
            } else if path.is_ident("timestamp_format") {
                parsed.timestamp_format = Some(string_value(&meta)?);
            } else if path.is_ident("connection") {
                parsed.connection = Some(string_value(&meta)?);
            } else if path.is_ident("writable") {
                parsed.writable = Some(bool_value(&meta)?);
            } else if path.is_ident("readable") {
                parsed.readable = Some(bool_value(&meta)?);
            } else if path.is_ident("updatable") {
                parsed.updatable = Some(bool_value(&meta)?);
            } else if path.is_ident("deletable") {
                parsed.deletable = Some(bool_value(&meta)?);
            } else {
                return Err(meta.error("unsupported model attribute"));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

/// Extract `accessors = path` from `#[entity(...)]` on the struct.
pub fn extract_accessors_path(attrs: &[Attribute]) -> syn::Result<Option<Path>> {
    let mut accessors = None;
    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("accessors") {
                accessors = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported entity attribute"))
            }
        })?;
    }
    Ok(accessors)
}

/// Whether the field is marked `#[entity(container)]`.
pub fn is_marked_container(field: &Field) -> syn::Result<bool> {
    let mut marked = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("container") {
                marked = true;
                Ok(())
            } else {
                Err(meta.error("unsupported entity field attribute"))
            }
        })?;
    }
    Ok(marked)
}

/// Whether the field's type is spelled `AttributeContainer` (any path prefix).
pub fn is_container_type(field: &Field) -> bool {
    match &field.ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "AttributeContainer"),
        _ => false,
    }
}
