//! Storage gateway error type.

use std::fmt;

/// Error type reported by a [`Gateway`](super::Gateway)
///
/// Models pass these through unchanged inside
/// [`ModelError::Gateway`](crate::ModelError::Gateway).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No connection could be resolved or established
    Connection(String),
    /// The statement was built but failed to execute
    Execution(String),
    /// The statement could not be built from the pending state
    QueryBuild(String),
    /// The gateway cannot evaluate the requested construct
    Unsupported(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Connection(s) => write!(f, "Connection error: {s}"),
            GatewayError::Execution(s) => write!(f, "Execution error: {s}"),
            GatewayError::QueryBuild(s) => write!(f, "Query build error: {s}"),
            GatewayError::Unsupported(s) => write!(f, "Unsupported by gateway: {s}"),
        }
    }
}

impl std::error::Error for GatewayError {}
