//! Macro implementations

pub mod entity;
pub mod model_definition;

pub use entity::derive_entity;
pub use model_definition::derive_model_definition;
