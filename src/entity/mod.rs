//! Entities: attribute containers with overridable accessors and mutators.
//!
//! An entity wraps one [`AttributeContainer`] and resolves every named access
//! through a two-tier lookup: the type's [`Accessors`] registry first, the raw
//! attribute slot second.

mod accessors;
mod container;
mod error;

pub use accessors::{Accessors, Getter, Setter};
pub use container::{AttributeContainer, AttributeMap};
pub use error::EntityError;

use serde_json::Value;

use crate::naming::{parse_accessor_method, AccessorKind};

/// Trait for entity types hydrated and persisted by a [`Model`](crate::Model)
///
/// Implementors only supply access to their container (usually via
/// `#[derive(Entity)]`) and, optionally, an accessor registry. Everything else
/// is provided.
pub trait Entity: Sized + 'static {
    /// Wrap a container. Called once per constructed entity.
    fn from_container(container: AttributeContainer) -> Self;

    fn container(&self) -> &AttributeContainer;

    fn container_mut(&mut self) -> &mut AttributeContainer;

    /// Accessors and mutators for this type, if any.
    fn accessors() -> Option<&'static Accessors<Self>> {
        None
    }

    /// Construct an entity from optional initial data.
    ///
    /// The raw initial data becomes the original snapshot before anything
    /// else happens; it is then applied through [`set`](Entity::set), so
    /// mutators see every initial value.
    fn from_attributes(initial: Option<AttributeMap>) -> Self {
        let snapshot = initial.clone().unwrap_or_default();
        let mut entity = Self::from_container(AttributeContainer::with_original(snapshot));
        entity.fill(initial);
        entity
    }

    fn empty() -> Self {
        Self::from_attributes(None)
    }

    /// Apply every entry of `data` through [`set`](Entity::set).
    fn fill(&mut self, data: Option<AttributeMap>) -> &mut Self {
        for (name, value) in data.into_iter().flatten() {
            self.set(&name, value);
        }
        self
    }

    /// Set `name` through its mutator when one is registered, otherwise in
    /// the raw slot. Returns the value that was passed in.
    fn set(&mut self, name: &str, value: Value) -> Value {
        if let Some(setter) = Self::accessors().and_then(|a| a.setter_for(name)) {
            setter(self, value.clone());
            return value;
        }
        self.container_mut().insert(name, value.clone());
        value
    }

    /// Read `name` through its accessor when one is registered, otherwise from
    /// the raw slot. Absent attributes read as `Value::Null`.
    fn get(&self, name: &str) -> Value {
        if let Some(getter) = Self::accessors().and_then(|a| a.getter_for(name)) {
            return getter(self);
        }
        self.container().raw(name).cloned().unwrap_or(Value::Null)
    }

    /// Whether the raw slot for `name` exists. Accessors are not consulted.
    fn has(&self, name: &str) -> bool {
        self.container().contains(name)
    }

    fn unset(&mut self, name: &str) {
        self.container_mut().remove(name);
    }

    /// Raw attributes, accessors not applied.
    fn to_array(&self) -> &AttributeMap {
        self.container().attributes()
    }

    /// Same as [`to_array`](Entity::to_array).
    fn get_attributes(&self) -> &AttributeMap {
        self.to_array()
    }

    /// Snapshot taken at construction.
    fn original_attributes(&self) -> &AttributeMap {
        self.container().original()
    }

    /// Dispatch an accessor-shaped method call by name.
    ///
    /// Registered accessors and mutators are matched on their derived method
    /// name. Unregistered `get<Name>Attribute` / `set<Name>Attribute` calls
    /// fall back to the raw slot of `<name>` in snake_case.
    ///
    /// # Errors
    ///
    /// [`EntityError::UnsupportedOperation`] for any other method name and
    /// [`EntityError::MissingArgument`] for a `set…` call without a value.
    fn call(&mut self, method: &str, mut args: Vec<Value>) -> Result<Value, EntityError> {
        if let Some(accessors) = Self::accessors() {
            if let Some(getter) = accessors.getter_by_method(method) {
                return Ok(getter(self));
            }
            if let Some(setter) = accessors.setter_by_method(method) {
                let value = take_first(method, &mut args)?;
                setter(self, value.clone());
                return Ok(value);
            }
        }

        let (kind, attribute) = parse_accessor_method(method)
            .ok_or_else(|| EntityError::UnsupportedOperation(method.to_string()))?;

        match kind {
            AccessorKind::Get => Ok(self
                .container()
                .raw(&attribute)
                .cloned()
                .unwrap_or(Value::Null)),
            AccessorKind::Set => {
                let value = take_first(method, &mut args)?;
                self.container_mut().insert(attribute, value.clone());
                Ok(value)
            }
        }
    }
}

fn take_first(method: &str, args: &mut Vec<Value>) -> Result<Value, EntityError> {
    if args.is_empty() {
        return Err(EntityError::MissingArgument(method.to_string()));
    }
    Ok(args.swap_remove(0))
}

/// Plain entity with no accessors; the default hydration target of a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: AttributeContainer,
}

impl Entity for Record {
    fn from_container(container: AttributeContainer) -> Self {
        Record {
            attributes: container,
        }
    }

    fn container(&self) -> &AttributeContainer {
        &self.attributes
    }

    fn container_mut(&mut self) -> &mut AttributeContainer {
        &mut self.attributes
    }
}

impl From<AttributeMap> for Record {
    fn from(data: AttributeMap) -> Self {
        Record::from_attributes(Some(data))
    }
}
