//! Handler error types

use super::event::RequestType;

/// Problems with the properties or identity carried by an event
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Required property {0} not set")]
    MissingProperty(&'static str),

    #[error("Unknown properties found: {}", .0.join(", "))]
    UnknownProperties(Vec<String>),

    #[error("Property {name} is invalid: {reason}")]
    InvalidProperty { name: &'static str, reason: String },

    #[error("PhysicalResourceId is required for {0} requests")]
    MissingPhysicalResourceId(RequestType),
}

/// Error returned by a resource handler.
///
/// Every variant fails the lifecycle event; remote errors are carried
/// unchanged.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported request type: {0}")]
    UnsupportedOperation(String),

    #[error("Remote call failed: {0:#}")]
    Remote(anyhow::Error),

    #[error("Malformed identifier {arn:?}: {reason}")]
    MalformedIdentifier { arn: String, reason: &'static str },
}

impl HandlerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, HandlerError::Validation(_))
    }
}
