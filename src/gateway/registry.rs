//! Gateway resolution: one default handle plus credential-keyed handles.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::{GatewayError, SharedGateway};
use crate::config::LifeboatConfig;
use crate::model::DEFAULT_TIMESTAMP_FORMAT;

/// Connection credentials naming a non-default gateway.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub dsn: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Empty credentials select the default gateway.
    pub fn is_empty(&self) -> bool {
        self.dsn.is_empty() && self.username.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("dsn", &self.dsn)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Builds a gateway for a set of credentials.
pub type Connector =
    Box<dyn Fn(&Credentials) -> Result<SharedGateway, GatewayError> + Send + Sync>;

/// Explicit replacement for a process-wide default connection.
///
/// Configure one registry at startup and build models from it with
/// [`Model::from_registry`](crate::Model::from_registry). Models without
/// credentials share the default gateway; models with credentials get one
/// handle per distinct credential set, created on first use.
pub struct GatewayRegistry {
    default: SharedGateway,
    connector: Option<Connector>,
    connections: Mutex<HashMap<Credentials, SharedGateway>>,
    timestamp_format: String,
}

impl GatewayRegistry {
    pub fn new(default: SharedGateway) -> Self {
        Self {
            default,
            connector: None,
            connections: Mutex::new(HashMap::new()),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    /// Registry whose default gateway is connected with the configured
    /// default credentials.
    pub fn from_config(config: &LifeboatConfig, connector: Connector) -> Result<Self, GatewayError> {
        let credentials = config.connection.clone().unwrap_or_default();
        let default = connector(&credentials)?;
        log::info!("Default gateway connected ({:?})", credentials);
        Ok(Self::new(default)
            .with_timestamp_format(config.timestamp_format.clone())
            .with_connector(connector))
    }

    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Timestamp format for models that do not set their own.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    pub fn default_gateway(&self) -> SharedGateway {
        self.default.clone()
    }

    /// Gateway for `credentials`: the default one when absent or empty,
    /// otherwise the cached (or newly connected) credential-keyed one.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Connection`] when credentials are given but no
    /// connector is registered; connector failures pass through.
    pub fn resolve(&self, credentials: Option<&Credentials>) -> Result<SharedGateway, GatewayError> {
        let credentials = match credentials {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(self.default_gateway()),
        };

        if let Some(gateway) = self.cached(credentials) {
            return Ok(gateway);
        }

        let connector = self.connector.as_ref().ok_or_else(|| {
            GatewayError::Connection(format!(
                "no connector registered for credentials {:?}",
                credentials
            ))
        })?;
        // Connect unlocked: a connector may resolve through this registry
        let gateway = connector(credentials)?;
        log::debug!("Connected gateway for {:?}", credentials);

        // A concurrent resolve may have won; keep the first handle
        let mut connections = self.connections();
        Ok(connections
            .entry(credentials.clone())
            .or_insert(gateway)
            .clone())
    }

    fn connections(&self) -> MutexGuard<'_, HashMap<Credentials, SharedGateway>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self, credentials: &Credentials) -> Option<SharedGateway> {
        self.connections().get(credentials).cloned()
    }
}

impl fmt::Debug for GatewayRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayRegistry")
            .field("has_connector", &self.connector.is_some())
            .field("timestamp_format", &self.timestamp_format)
            .finish_non_exhaustive()
    }
}
