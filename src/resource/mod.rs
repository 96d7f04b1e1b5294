//! Custom resource handlers
//!
//! Translate provisioning lifecycle events into Device Farm API calls.
//!
//! # Architecture
//!
//! - [`event`] - Lifecycle event and response wire types
//! - [`validation`] - Per-resource property rules and typed extraction
//! - [`project`] - Project handler (with the "Top Devices" lookup)
//! - [`device_pool`] - Device pool handler
//! - [`arn`] - ARN parsing helpers
//!
//! Every handler implements [`ResourceHandler`]; [`dispatch`] validates the
//! event and routes it to `create`, `update` or `delete`.
//!
//! # Example
//!
//! ```ignore
//! use crate::resource::{project::ProjectHandler, ResourceHandler};
//!
//! async fn run(client: &DeviceFarmClient, event: &LifecycleEvent) -> Result<HandlerResponse, HandlerError> {
//!     ProjectHandler::new(client).handle(event).await
//! }
//! ```

pub mod arn;
pub mod device_pool;
pub mod error;
pub mod event;
pub mod project;
pub mod validation;

pub use error::{HandlerError, ValidationError};
pub use event::{HandlerResponse, LifecycleEvent, RequestType, ResourceProperties};

use async_trait::async_trait;
use validation::PropertySchema;

/// A custom resource backed by Device Farm
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Property rules for this resource type
    fn schema(&self) -> &'static PropertySchema;

    async fn create(&self, properties: &ResourceProperties)
        -> Result<HandlerResponse, HandlerError>;

    /// `arn` is the existing PhysicalResourceId and is never changed
    async fn update(
        &self,
        arn: &str,
        properties: &ResourceProperties,
    ) -> Result<HandlerResponse, HandlerError>;

    async fn delete(&self, arn: &str) -> Result<HandlerResponse, HandlerError>;

    /// Validate and route a lifecycle event
    async fn handle(&self, event: &LifecycleEvent) -> Result<HandlerResponse, HandlerError> {
        dispatch(self, event).await
    }
}

/// Route an event to the matching operation of `handler`.
///
/// Nothing is sent to Device Farm unless validation passes.
pub async fn dispatch<H>(handler: &H, event: &LifecycleEvent) -> Result<HandlerResponse, HandlerError>
where
    H: ResourceHandler + ?Sized,
{
    let schema = handler.schema();
    let properties = &event.resource_properties;

    tracing::info!(
        resource = schema.resource_type,
        request_type = %event.request_type,
        request_id = event.request_id.as_deref().unwrap_or("-"),
        logical_id = event.logical_resource_id.as_deref().unwrap_or("-"),
        "Handling lifecycle event"
    );

    match &event.request_type {
        RequestType::Create => {
            schema.validate(&event.request_type, properties)?;
            handler.create(properties).await
        }
        RequestType::Update | RequestType::Delete => {
            // Unknown keys also fail Delete, so a stale key left on a stack
            // blocks its removal until the key is dropped
            schema.validate(&event.request_type, properties)?;
            let arn = event.existing_id().ok_or_else(|| {
                ValidationError::MissingPhysicalResourceId(event.request_type.clone())
            })?;

            if event.request_type == RequestType::Update {
                handler.update(arn, properties).await
            } else {
                handler.delete(arn).await
            }
        }
        RequestType::Other(other) => Err(HandlerError::UnsupportedOperation(other.clone())),
    }
}
