//! Static description of a model: schema identity, capabilities and
//! timestamp/soft-delete columns.

use crate::entity::Entity;
use crate::gateway::Credentials;

/// Default strftime format for timestamp columns.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Class of operation gated by a capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Write,
    Read,
    Update,
    Delete,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Write => "write",
            Capability::Read => "read",
            Capability::Update => "update",
            Capability::Delete => "delete",
        }
    }
}

/// Per-operation capability flags. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub writable: bool,
    pub readable: bool,
    pub updatable: bool,
    pub deletable: bool,
}

impl Capabilities {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Write => self.writable,
            Capability::Read => self.readable,
            Capability::Update => self.updatable,
            Capability::Delete => self.deletable,
        }
    }

    /// Only reads allowed.
    pub fn read_only() -> Self {
        Self {
            writable: false,
            readable: true,
            updatable: false,
            deletable: false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            writable: true,
            readable: true,
            updatable: true,
            deletable: true,
        }
    }
}

/// Options returned by [`ModelDefinition::options`].
///
/// Empty strings for the optional columns mean "not configured", like `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    /// Backing table; defaults to the snake_case of the definition's type name
    pub schema: Option<String>,
    pub schema_id: String,
    pub capabilities: Capabilities,
    pub created_field: Option<String>,
    pub updated_field: Option<String>,
    pub deleted_field: Option<String>,
    pub use_soft_deletes: bool,
    /// Falls back to the registry's format, then [`DEFAULT_TIMESTAMP_FORMAT`]
    pub timestamp_format: Option<String>,
    /// Non-empty credentials select a dedicated gateway from the registry
    pub credentials: Option<Credentials>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            schema: None,
            schema_id: "id".to_string(),
            capabilities: Capabilities::default(),
            created_field: None,
            updated_field: None,
            deleted_field: None,
            use_soft_deletes: false,
            timestamp_format: None,
            credentials: None,
        }
    }
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn schema_id(mut self, schema_id: impl Into<String>) -> Self {
        self.schema_id = schema_id.into();
        self
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.capabilities.writable = writable;
        self
    }

    pub fn readable(mut self, readable: bool) -> Self {
        self.capabilities.readable = readable;
        self
    }

    pub fn updatable(mut self, updatable: bool) -> Self {
        self.capabilities.updatable = updatable;
        self
    }

    pub fn deletable(mut self, deletable: bool) -> Self {
        self.capabilities.deletable = deletable;
        self
    }

    pub fn created_field(mut self, field: impl Into<String>) -> Self {
        self.created_field = Some(field.into());
        self
    }

    pub fn updated_field(mut self, field: impl Into<String>) -> Self {
        self.updated_field = Some(field.into());
        self
    }

    pub fn deleted_field(mut self, field: impl Into<String>) -> Self {
        self.deleted_field = Some(field.into());
        self
    }

    pub fn soft_deletes(mut self, enabled: bool) -> Self {
        self.use_soft_deletes = enabled;
        self
    }

    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Trait describing one model: its entity type and its options
///
/// Usually derived:
///
/// ```
/// use lifeboat::ModelDefinition;
///
/// #[derive(ModelDefinition)]
/// #[model(created_field = "created_at", soft_deletes, deleted_field = "deleted_at")]
/// struct BlogPost;
///
/// let options = BlogPost::options();
/// assert_eq!(options.schema.as_deref(), Some("blog_post"));
/// assert!(options.use_soft_deletes);
/// ```
pub trait ModelDefinition: 'static {
    /// Type rows are hydrated into on read
    type Entity: Entity;

    fn options() -> ModelOptions {
        ModelOptions::default()
    }
}
