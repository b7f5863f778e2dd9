//! Procedural macros for Lifeboat
//!
//! This crate provides derive macros for `Entity` and `ModelDefinition`.

mod attributes;
mod macros;
mod utils;

use proc_macro::TokenStream;

/// Derive macro for `Entity` - wires a struct holding an `AttributeContainer`
///
/// The container field is found by type (`AttributeContainer`) or by the
/// `#[entity(container)]` marker. Every other field is filled with
/// `Default::default()` on hydration.
///
/// `#[entity(accessors = path)]` names a function returning
/// `&'static Accessors<Self>`; without it the entity has no accessors or
/// mutators and every access goes straight to raw storage.
///
/// See `lifeboat-derive/tests/test_entity.rs` for usage examples.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    macros::derive_entity(input)
}

/// Derive macro for `ModelDefinition` - declares a model's static options
///
/// Supported `#[model(...)]` keys:
/// - `entity = Type` (defaults to `lifeboat::Record`)
/// - `schema = "..."` (defaults to the snake_case struct name)
/// - `schema_id`, `created_field`, `updated_field`, `deleted_field`
/// - `soft_deletes` (flag or `= bool`)
/// - `timestamp_format = "..."` (chrono strftime)
/// - `connection = "dsn"`
/// - `writable`, `readable`, `updatable`, `deletable` (`= bool`)
///
/// See `lifeboat-derive/tests/test_model_definition.rs` for usage examples.
#[proc_macro_derive(ModelDefinition, attributes(model))]
pub fn derive_model_definition(input: TokenStream) -> TokenStream {
    macros::derive_model_definition(input)
}
