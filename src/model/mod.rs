//! Schema-bound CRUD orchestration.
//!
//! A [`Model`] turns create/read/update/delete/save intents into gateway
//! calls. It owns the schema identity, enforces the capability flags before
//! touching the gateway, stamps timestamp columns and applies soft-delete
//! filtering transparently.

mod clock;
mod error;
mod options;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ModelError;
pub use options::{
    Capabilities, Capability, ModelDefinition, ModelOptions, DEFAULT_TIMESTAMP_FORMAT,
};

use std::fmt::{self, Write as _};
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use sea_query::Condition;
use serde_json::Value;

use crate::entity::{AttributeMap, Entity};
use crate::gateway::{
    lock, Conditions, Credentials, Criterion, Filter, Gateway, GatewayError, GatewayRegistry,
    Records, SharedGateway,
};
#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;
use crate::naming::{pascal_to_snake, short_type_name};

/// Which soft-delete filter the next [`Model::read`] applies.
///
/// One-shot: every read reverts the model to `Normal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadScope {
    /// Skip soft-deleted rows (`deleted_field IS NULL`)
    #[default]
    Normal,
    /// Only soft-deleted rows (`deleted_field IS NOT NULL`)
    OnlyDeleted,
}

/// CRUD entry point for one [`ModelDefinition`].
///
/// Operations take `&mut self`: a model carries per-call state (the next-read
/// scope and the gateway's pending filters) that the following call consumes.
///
/// # Example
///
/// ```
/// use lifeboat::gateway::{shared, Conditions, MemoryGateway};
/// use lifeboat::{Entity, Model, ModelDefinition};
/// use serde_json::json;
///
/// #[derive(ModelDefinition)]
/// #[model(soft_deletes, deleted_field = "deleted_at")]
/// struct Users;
///
/// # fn main() -> Result<(), lifeboat::ModelError> {
/// let mut users = Model::<Users>::new(shared(MemoryGateway::new()))?;
/// let row = json!({"id": 1, "name": "Ann"}).as_object().cloned().unwrap_or_default();
/// users.create(row)?;
/// users.delete(Some(Conditions::new().eq("id", json!(1))), false)?;
///
/// assert_eq!(users.read(&[], Conditions::new())?.count(), 0);
/// users.next_read(lifeboat::ReadScope::OnlyDeleted);
/// let trashed = users.read(&[], Conditions::new())?.collect_all()?;
/// assert_eq!(trashed[0].get("name"), json!("Ann"));
/// # Ok(())
/// # }
/// ```
pub struct Model<D: ModelDefinition> {
    gateway: SharedGateway,
    schema: String,
    options: ModelOptions,
    /// Set only when soft deletes are enabled
    deleted_column: Option<String>,
    timestamp_format: String,
    clock: Arc<dyn Clock>,
    next_read: ReadScope,
    _definition: PhantomData<fn() -> D>,
}

fn configured(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|f| !f.is_empty())
}

/// A usable format renders and contains at least one date/time field;
/// anything else would stamp the same literal text on every row.
fn validate_format(format: &str) -> Result<(), ModelError> {
    let mut has_field = false;
    for item in StrftimeItems::new(format) {
        match item {
            Item::Error => {
                return Err(ModelError::Configuration(format!(
                    "invalid timestamp format {:?}",
                    format
                )))
            }
            Item::Numeric(..) | Item::Fixed(_) => has_field = true,
            _ => {}
        }
    }
    if !has_field {
        return Err(ModelError::Configuration(format!(
            "timestamp format {:?} has no strftime specifier",
            format
        )));
    }
    format_timestamp(NaiveDateTime::default(), format).map(|_| ())
}

fn format_timestamp(at: NaiveDateTime, format: &str) -> Result<String, ModelError> {
    let mut out = String::new();
    write!(out, "{}", at.format(format)).map_err(|_| {
        ModelError::Configuration(format!("invalid timestamp format {:?}", format))
    })?;
    Ok(out)
}

fn push_once(gateway: &mut dyn Gateway, filter: Filter) {
    if !gateway.has_pending(&filter) {
        gateway.filter(filter);
    }
}

impl<D: ModelDefinition> Model<D> {
    /// Build a model bound to `gateway`.
    ///
    /// # Errors
    ///
    /// [`ModelError::Configuration`] when soft deletes are enabled without a
    /// deleted field, or the timestamp format cannot be rendered.
    pub fn new(gateway: SharedGateway) -> Result<Self, ModelError> {
        Self::configure(D::options(), DEFAULT_TIMESTAMP_FORMAT, |_| Ok(gateway))
    }

    /// Build a model whose gateway is resolved from `registry`: the default
    /// one, or the credential-keyed one when the options carry credentials.
    pub fn from_registry(registry: &GatewayRegistry) -> Result<Self, ModelError> {
        Self::configure(D::options(), registry.timestamp_format(), |credentials| {
            registry.resolve(credentials)
        })
    }

    fn configure<F>(options: ModelOptions, fallback_format: &str, acquire: F) -> Result<Self, ModelError>
    where
        F: FnOnce(Option<&Credentials>) -> Result<SharedGateway, GatewayError>,
    {
        let schema = match configured(&options.schema) {
            Some(schema) => schema.to_string(),
            None => pascal_to_snake(short_type_name::<D>()),
        };

        let deleted_column = if options.use_soft_deletes {
            match configured(&options.deleted_field) {
                Some(field) => Some(field.to_string()),
                None => {
                    log::warn!("Model {} enables soft deletes without a deleted field", schema);
                    return Err(ModelError::Configuration(format!(
                        "{}: there must be a deleted field to use soft deletes",
                        schema
                    )));
                }
            }
        } else {
            None
        };

        let timestamp_format = configured(&options.timestamp_format)
            .unwrap_or(fallback_format)
            .to_string();
        if let Err(e) = validate_format(&timestamp_format) {
            log::warn!("Model {} rejected: {}", schema, e);
            return Err(e);
        }

        let gateway = acquire(options.credentials.as_ref())?;

        Ok(Self {
            gateway,
            schema,
            options,
            deleted_column,
            timestamp_format,
            clock: Arc::new(SystemClock),
            next_read: ReadScope::Normal,
            _definition: PhantomData,
        })
    }

    /// Replace the time source used for timestamp columns.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn schema_id(&self) -> &str {
        &self.options.schema_id
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    pub fn gateway(&self) -> &SharedGateway {
        &self.gateway
    }

    /// Insert one row, stamping the created field when configured.
    pub fn create(&mut self, mut set: AttributeMap) -> Result<bool, ModelError> {
        self.ensure(Capability::Write)?;
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::operation_span("create", &self.schema).entered();

        if let Some(field) = configured(&self.options.created_field) {
            set.insert(field.to_string(), self.now()?);
        }

        let result = lock(&self.gateway).create(&self.schema, set);
        self.finish("create", result)
    }

    /// Insert several rows, stamping each with the same created time.
    pub fn create_batch(&mut self, mut rows: Vec<AttributeMap>) -> Result<bool, ModelError> {
        self.ensure(Capability::Write)?;
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::operation_span("create_batch", &self.schema).entered();

        if let Some(field) = configured(&self.options.created_field) {
            let now = self.now()?;
            for row in &mut rows {
                row.insert(field.to_string(), now.clone());
            }
        }

        let result = lock(&self.gateway).create_batch(&self.schema, rows);
        self.finish("create_batch", result)
    }

    /// Read `selector` columns (all when empty) matching `conditions`.
    ///
    /// With soft deletes the next-read scope picks the deleted-field filter,
    /// unless the gateway already holds one for the deleted field. The scope
    /// reverts to [`ReadScope::Normal`] afterwards. Rows are hydrated lazily.
    pub fn read(
        &mut self,
        selector: &[&str],
        conditions: Conditions,
    ) -> Result<Records<D::Entity>, ModelError> {
        self.ensure(Capability::Read)?;
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::operation_span("read", &self.schema).entered();

        let scope = std::mem::take(&mut self.next_read);
        let selector: Vec<String> = selector.iter().map(|s| s.to_string()).collect();

        let mut gateway = lock(&self.gateway);
        if let Some(column) = &self.deleted_column {
            let only_deleted = Filter::IsNotNull(column.clone());
            let live = Filter::IsNull(column.clone());
            match scope {
                ReadScope::OnlyDeleted => push_once(&mut *gateway, only_deleted),
                ReadScope::Normal => {
                    if !gateway.has_pending(&only_deleted) {
                        push_once(&mut *gateway, live);
                    }
                }
            }
        }
        let result = gateway.read(&self.schema, &selector, &conditions);
        drop(gateway);

        self.finish("read", result).map(|rows| rows.as_type::<D::Entity>())
    }

    /// Read every column of every visible row.
    pub fn all(&mut self) -> Result<Records<D::Entity>, ModelError> {
        self.read(&[], Conditions::new())
    }

    /// Update rows. A non-null schema id in `set` becomes an equality filter
    /// and is never written as a column.
    pub fn update(&mut self, mut set: AttributeMap) -> Result<bool, ModelError> {
        self.ensure(Capability::Update)?;
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::operation_span("update", &self.schema).entered();

        let identity = if self.options.schema_id.is_empty() {
            None
        } else {
            set.shift_remove(&self.options.schema_id)
        };
        if let Some(field) = configured(&self.options.updated_field) {
            set.insert(field.to_string(), self.now()?);
        }

        let mut gateway = lock(&self.gateway);
        if let Some(id) = identity.filter(|id| !id.is_null()) {
            gateway.where_eq(&self.options.schema_id, id);
        }
        if let Some(column) = &self.deleted_column {
            push_once(&mut *gateway, Filter::IsNull(column.clone()));
        }
        let result = gateway.update(&self.schema, set);
        drop(gateway);

        self.finish("update", result)
    }

    /// Update each row matched on `reference` (the schema id when `None`).
    pub fn update_batch(
        &mut self,
        mut rows: Vec<AttributeMap>,
        reference: Option<&str>,
    ) -> Result<bool, ModelError> {
        self.ensure(Capability::Update)?;
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::operation_span("update_batch", &self.schema).entered();

        if let Some(field) = configured(&self.options.updated_field) {
            let now = self.now()?;
            for row in &mut rows {
                row.insert(field.to_string(), now.clone());
            }
        }
        let reference = reference.unwrap_or(&self.options.schema_id);

        let mut gateway = lock(&self.gateway);
        if let Some(column) = &self.deleted_column {
            push_once(&mut *gateway, Filter::IsNull(column.clone()));
        }
        let result = gateway.update_batch(reference, &self.schema, rows);
        drop(gateway);

        self.finish("update_batch", result)
    }

    /// Delete rows matching `conditions`.
    ///
    /// With soft deletes and `purge == false` the rows are stamped through an
    /// update of the deleted field instead; anything else is a hard delete.
    pub fn delete(&mut self, conditions: Option<Conditions>, purge: bool) -> Result<bool, ModelError> {
        self.ensure(Capability::Delete)?;
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::operation_span("delete", &self.schema).entered();

        let result = match &self.deleted_column {
            Some(column) if !purge => {
                let now = self.now()?;
                let mut gateway = lock(&self.gateway);
                push_once(&mut *gateway, Filter::IsNull(column.clone()));
                gateway.set(column, now);
                for criterion in conditions.into_iter().flatten() {
                    match criterion {
                        Criterion::Equals { column: name, value } => gateway.where_eq(&name, value),
                        Criterion::Raw(condition) => gateway.where_raw(condition),
                    }
                }
                gateway.update(&self.schema, AttributeMap::new())
            }
            _ => lock(&self.gateway).delete(&self.schema, conditions.as_ref()),
        };

        self.finish("delete", result)
    }

    /// Persist `entity`: update when its raw attributes carry a non-null
    /// schema id, create otherwise.
    pub fn save<E: Entity>(&mut self, entity: &E) -> Result<bool, ModelError> {
        let data = entity.to_array().clone();
        let schema_id = &self.options.schema_id;
        let identified =
            !schema_id.is_empty() && data.get(schema_id).is_some_and(|id| !id.is_null());

        if identified {
            self.update(data)
        } else {
            self.create(data)
        }
    }

    /// Arm the scope consumed by the next [`read`](Model::read).
    pub fn next_read(&mut self, scope: ReadScope) -> &mut Self {
        self.next_read = scope;
        self
    }

    pub fn read_scope(&self) -> ReadScope {
        self.next_read
    }

    /// Restrict the pending query to soft-deleted rows. No-op without soft
    /// deletes.
    ///
    /// The filter lives on the gateway with the other pending filters, so a
    /// terminal call from any model sharing the gateway consumes it.
    pub fn only_deleted(&mut self) -> &mut Self {
        if let Some(column) = &self.deleted_column {
            push_once(&mut *lock(&self.gateway), Filter::IsNotNull(column.clone()));
        }
        self
    }

    /// Restrict the pending query to live rows. No-op without soft deletes.
    pub fn ignore_deleted(&mut self) -> &mut Self {
        if let Some(column) = &self.deleted_column {
            push_once(&mut *lock(&self.gateway), Filter::IsNull(column.clone()));
        }
        self
    }

    pub fn where_eq(&mut self, column: &str, value: Value) -> &mut Self {
        lock(&self.gateway).where_eq(column, value);
        self
    }

    pub fn where_raw(&mut self, condition: Condition) -> &mut Self {
        lock(&self.gateway).where_raw(condition);
        self
    }

    pub fn where_is_null(&mut self, column: &str) -> &mut Self {
        lock(&self.gateway).where_is_null(column);
        self
    }

    pub fn where_is_not_null(&mut self, column: &str) -> &mut Self {
        lock(&self.gateway).where_is_not_null(column);
        self
    }

    fn now(&self) -> Result<Value, ModelError> {
        format_timestamp(self.clock.now(), &self.timestamp_format).map(Value::String)
    }

    fn ensure(&self, capability: Capability) -> Result<(), ModelError> {
        if self.options.capabilities.allows(capability) {
            return Ok(());
        }
        log::warn!("Refused {} on {}: capability disabled", capability.as_str(), self.schema);
        #[cfg(feature = "metrics")]
        METRICS.record_denial(capability.as_str());

        Err(match capability {
            Capability::Write => ModelError::NotWritable,
            Capability::Read => ModelError::NotReadable,
            Capability::Update => ModelError::NotUpdatable,
            Capability::Delete => ModelError::NotDeletable,
        })
    }

    fn finish<T>(&self, operation: &'static str, result: Result<T, GatewayError>) -> Result<T, ModelError> {
        log::debug!("{} on {}", operation, self.schema);
        #[cfg(feature = "metrics")]
        METRICS.record_operation(operation);

        result.map_err(|e| {
            log::debug!("{} on {} failed: {}", operation, self.schema, e);
            #[cfg(feature = "metrics")]
            METRICS.record_gateway_error(operation);
            ModelError::Gateway(e)
        })
    }
}

impl<D: ModelDefinition> fmt::Debug for Model<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .field("timestamp_format", &self.timestamp_format)
            .field("next_read", &self.next_read)
            .finish_non_exhaustive()
    }
}
