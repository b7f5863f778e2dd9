//! Raw attribute storage shared by every entity type.

use serde_json::{Map, Value};

/// Insertion-ordered attribute name → value mapping.
pub type AttributeMap = Map<String, Value>;

/// Name-indexed bag of raw attribute values plus the snapshot taken when the
/// owning entity was constructed.
///
/// The container knows nothing about accessors or mutators; that resolution
/// lives on [`Entity`](super::Entity). Reading and writing here always hits the
/// raw slot, which is what accessor implementations use internally.
#[derive(Clone, Default, PartialEq)]
pub struct AttributeContainer {
    attributes: AttributeMap,
    original: AttributeMap,
}

impl AttributeContainer {
    /// Empty container with an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Container whose snapshot is `original` and whose live attributes are
    /// still empty. The snapshot cannot be changed afterwards.
    pub(crate) fn with_original(original: AttributeMap) -> Self {
        Self {
            attributes: AttributeMap::new(),
            original,
        }
    }

    /// Raw value stored under `name`.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Store `value` under `name`, bypassing any mutator.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    /// Remove and return the raw value stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn original(&self) -> &AttributeMap {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

// Only the live attributes are shown; the snapshot is bookkeeping.
impl std::fmt::Debug for AttributeContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.attributes.iter()).finish()
    }
}
