//! Storage gateway contract consumed by [`Model`](crate::Model).
//!
//! The gateway owns statement construction, execution and connection state.
//! Models only drive it: they push pending filters and assignments, then call
//! one terminal operation (`create`, `read`, `update`, …) which consumes them.

mod error;
mod memory;
mod recording;
mod registry;
mod result;

pub use error::GatewayError;
pub use memory::MemoryGateway;
pub use recording::{GatewayCall, RecordingGateway};
pub use registry::{Connector, Credentials, GatewayRegistry};
pub use result::{Records, ResultSet};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sea_query::Condition;
use serde_json::Value;

use crate::entity::AttributeMap;

/// A pending filter on the gateway, applied by the next terminal operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals { column: String, value: Value },
    IsNull(String),
    IsNotNull(String),
    /// Already-built predicate
    Raw(Condition),
}

/// One entry of a [`Conditions`] list.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// `column = value`
    Equals { column: String, value: Value },
    /// Already-built predicate
    Raw(Condition),
}

impl From<Criterion> for Filter {
    fn from(criterion: Criterion) -> Self {
        match criterion {
            Criterion::Equals { column, value } => Filter::Equals { column, value },
            Criterion::Raw(condition) => Filter::Raw(condition),
        }
    }
}

/// Ordered conditions passed to `read` and `delete`.
///
/// Built from an [`AttributeMap`] (every entry an equality) or fluently:
///
/// ```
/// use lifeboat::gateway::Conditions;
/// use sea_query::{Condition, Expr};
/// use serde_json::json;
///
/// let conditions = Conditions::new()
///     .eq("status", json!("active"))
///     .raw(Condition::all().add(Expr::cust("age > 18")));
/// assert_eq!(conditions.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    criteria: Vec<Criterion>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: Value) -> Self {
        self.criteria.push(Criterion::Equals {
            column: column.into(),
            value,
        });
        self
    }

    pub fn raw(mut self, condition: Condition) -> Self {
        self.criteria.push(Criterion::Raw(condition));
        self
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.criteria.iter()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl From<AttributeMap> for Conditions {
    fn from(map: AttributeMap) -> Self {
        map.into_iter()
            .map(|(column, value)| Criterion::Equals { column, value })
            .collect()
    }
}

impl FromIterator<Criterion> for Conditions {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Conditions {
    type Item = Criterion;
    type IntoIter = std::vec::IntoIter<Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.into_iter()
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.iter()
    }
}

/// Trait for the external storage component a model delegates to
///
/// Filters and assignments pushed with [`filter`](Gateway::filter) and
/// [`set`](Gateway::set) are pending state; each terminal operation consumes
/// (and clears) the pending state it applies to.
pub trait Gateway: Send {
    /// Insert one row.
    fn create(&mut self, schema: &str, row: AttributeMap) -> Result<bool, GatewayError>;

    /// Insert several rows.
    fn create_batch(&mut self, schema: &str, rows: Vec<AttributeMap>)
        -> Result<bool, GatewayError>;

    /// Select `selector` columns (all when empty) matching `conditions` and
    /// the pending filters.
    fn read(
        &mut self,
        schema: &str,
        selector: &[String],
        conditions: &Conditions,
    ) -> Result<ResultSet, GatewayError>;

    /// Update rows matching the pending filters with `row` merged over the
    /// pending assignments. `row` may be empty.
    fn update(&mut self, schema: &str, row: AttributeMap) -> Result<bool, GatewayError>;

    /// Update each row in `rows`, matched on its `reference` column.
    fn update_batch(
        &mut self,
        reference: &str,
        schema: &str,
        rows: Vec<AttributeMap>,
    ) -> Result<bool, GatewayError>;

    /// Remove rows matching `conditions` and the pending filters.
    fn delete(&mut self, schema: &str, conditions: Option<&Conditions>)
        -> Result<bool, GatewayError>;

    /// Push a pending filter.
    fn filter(&mut self, filter: Filter);

    /// Whether `filter` is already pending for the next terminal operation.
    fn has_pending(&self, filter: &Filter) -> bool;

    /// Push a pending assignment for the next `update`.
    fn set(&mut self, column: &str, value: Value);

    fn where_eq(&mut self, column: &str, value: Value) {
        self.filter(Filter::Equals {
            column: column.to_string(),
            value,
        });
    }

    fn where_raw(&mut self, condition: Condition) {
        self.filter(Filter::Raw(condition));
    }

    fn where_is_null(&mut self, column: &str) {
        self.filter(Filter::IsNull(column.to_string()));
    }

    fn where_is_not_null(&mut self, column: &str) {
        self.filter(Filter::IsNotNull(column.to_string()));
    }
}

/// Gateway handle shared between models.
pub type SharedGateway = Arc<Mutex<dyn Gateway>>;

/// Wrap a gateway into a [`SharedGateway`].
pub fn shared<G: Gateway + 'static>(gateway: G) -> SharedGateway {
    Arc::new(Mutex::new(gateway))
}

/// Lock a shared gateway. A lock poisoned by a panicking holder is
/// recovered: gateway state is plain data and stays usable.
pub fn lock(gateway: &SharedGateway) -> MutexGuard<'_, dyn Gateway + 'static> {
    gateway.lock().unwrap_or_else(PoisonError::into_inner)
}
