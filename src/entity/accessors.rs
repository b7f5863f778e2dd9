//! Per-attribute accessor and mutator registry.

use std::collections::HashMap;

use serde_json::Value;

use crate::naming::{accessor_method, AccessorKind};

/// Accessor: computes the value returned by `get(name)`.
pub type Getter<E> = fn(&E) -> Value;

/// Mutator: receives the value passed to `set(name, value)`.
pub type Setter<E> = fn(&mut E, Value);

/// Accessors and mutators for one entity type, keyed by derived method name.
///
/// Registration takes attribute names; the key is the
/// `get<Name>Attribute` / `set<Name>Attribute` form, so lookups through either
/// the attribute name or the method name land on the same entry.
///
/// # Example
///
/// ```
/// use lifeboat::{Accessors, AttributeContainer, Entity};
/// use once_cell::sync::Lazy;
/// use serde_json::{json, Value};
///
/// #[derive(Debug)]
/// struct User(AttributeContainer);
///
/// static USER_ACCESSORS: Lazy<Accessors<User>> = Lazy::new(|| {
///     Accessors::<User>::new().setter("email", |user, value| {
///         let lowered = value.as_str().map(str::to_lowercase).map(Value::from);
///         user.0.insert("email", lowered.unwrap_or(value));
///     })
/// });
///
/// impl Entity for User {
///     fn from_container(container: AttributeContainer) -> Self { User(container) }
///     fn container(&self) -> &AttributeContainer { &self.0 }
///     fn container_mut(&mut self) -> &mut AttributeContainer { &mut self.0 }
///     fn accessors() -> Option<&'static Accessors<Self>> { Some(&USER_ACCESSORS) }
/// }
///
/// let mut user = User::empty();
/// user.set("email", json!("Ann@Example.COM"));
/// assert_eq!(user.get("email"), json!("ann@example.com"));
/// ```
pub struct Accessors<E> {
    getters: HashMap<String, Getter<E>>,
    setters: HashMap<String, Setter<E>>,
}

impl<E> Accessors<E> {
    pub fn new() -> Self {
        Self {
            getters: HashMap::new(),
            setters: HashMap::new(),
        }
    }

    /// Register the accessor for `attribute`.
    pub fn getter(mut self, attribute: &str, getter: Getter<E>) -> Self {
        self.getters
            .insert(accessor_method(AccessorKind::Get, attribute), getter);
        self
    }

    /// Register the mutator for `attribute`.
    pub fn setter(mut self, attribute: &str, setter: Setter<E>) -> Self {
        self.setters
            .insert(accessor_method(AccessorKind::Set, attribute), setter);
        self
    }

    pub fn getter_for(&self, attribute: &str) -> Option<Getter<E>> {
        self.getter_by_method(&accessor_method(AccessorKind::Get, attribute))
    }

    pub fn setter_for(&self, attribute: &str) -> Option<Setter<E>> {
        self.setter_by_method(&accessor_method(AccessorKind::Set, attribute))
    }

    pub fn getter_by_method(&self, method: &str) -> Option<Getter<E>> {
        self.getters.get(method).copied()
    }

    pub fn setter_by_method(&self, method: &str) -> Option<Setter<E>> {
        self.setters.get(method).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.getters.is_empty() && self.setters.is_empty()
    }
}

impl<E> Default for Accessors<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Accessors<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut getters: Vec<_> = self.getters.keys().collect();
        let mut setters: Vec<_> = self.setters.keys().collect();
        getters.sort();
        setters.sort();
        f.debug_struct("Accessors")
            .field("getters", &getters)
            .field("setters", &setters)
            .finish()
    }
}
