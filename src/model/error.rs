//! Error types for model operations.

use std::fmt;

use crate::gateway::GatewayError;

/// Error type for [`Model`](super::Model) construction and operations
///
/// Misuse of the model (configuration and capability errors) is kept apart
/// from storage failures, which arrive unchanged in [`ModelError::Gateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The model definition is unusable
    Configuration(String),
    /// Create operations are disabled
    NotWritable,
    /// Read operations are disabled
    NotReadable,
    /// Update operations are disabled
    NotUpdatable,
    /// Delete operations are disabled
    NotDeletable,
    /// The storage gateway failed
    Gateway(GatewayError),
}

impl ModelError {
    pub fn is_capability_error(&self) -> bool {
        matches!(
            self,
            ModelError::NotWritable
                | ModelError::NotReadable
                | ModelError::NotUpdatable
                | ModelError::NotDeletable
        )
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, ModelError::Configuration(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, ModelError::Gateway(_))
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Configuration(msg) => write!(f, "Model configuration error: {}", msg),
            ModelError::NotWritable => write!(f, "Model is not writable"),
            ModelError::NotReadable => write!(f, "Model is not readable"),
            ModelError::NotUpdatable => write!(f, "Model is not updatable"),
            ModelError::NotDeletable => write!(f, "Model is not deletable"),
            ModelError::Gateway(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Gateway(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GatewayError> for ModelError {
    fn from(err: GatewayError) -> Self {
        ModelError::Gateway(err)
    }
}
