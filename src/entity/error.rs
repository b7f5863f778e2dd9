//! Error types for entity attribute dispatch.

/// Error type for [`Entity::call`](super::Entity::call)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// The method name is not a registered accessor and does not have the
    /// `{get,set}<Name>Attribute` shape
    UnsupportedOperation(String),
    /// A `set<Name>Attribute` call was made without a value
    MissingArgument(String),
}

impl std::fmt::Display for EntityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityError::UnsupportedOperation(method) => {
                write!(f, "Unsupported entity operation: {}", method)
            }
            EntityError::MissingArgument(method) => {
                write!(f, "Missing value argument for {}", method)
            }
        }
    }
}

impl std::error::Error for EntityError {}
