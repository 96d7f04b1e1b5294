//! Project resource
//!
//! Creates, renames and deletes Device Farm projects. Create and Update also
//! report the project id and the ARN of the project's curated "Top Devices"
//! device pool.

use super::arn::project_id_from_arn;
use super::event::{HandlerResponse, ResourceProperties};
use super::validation::{required_string, PropertySchema};
use super::{HandlerError, ResourceHandler};
use crate::devicefarm::api::{CreateProjectParams, DeviceFarmApi, UpdateProjectParams};
use crate::devicefarm::pools;
use async_trait::async_trait;

pub const DATA_PROJECT_ID: &str = "ProjectId";
pub const DATA_TOP_DEVICES_POOL_ARN: &str = "TopDevicesDevicePoolArn";

pub static PROJECT_SCHEMA: PropertySchema = PropertySchema {
    resource_type: "Project",
    mandatory: &["Name"],
    known: &["Name", "ServiceToken"],
};

/// Handler for Device Farm projects
pub struct ProjectHandler<'a, C: DeviceFarmApi + ?Sized> {
    client: &'a C,
}

impl<'a, C: DeviceFarmApi + ?Sized> ProjectHandler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Build the Create/Update response for a project
    async fn describe(&self, arn: &str) -> Result<HandlerResponse, HandlerError> {
        let project_id = project_id_from_arn(arn)?;
        let mut response = HandlerResponse::with_arn(arn).with_data(DATA_PROJECT_ID, project_id);

        let top_devices = pools::find_top_devices_pool_arn(self.client, arn)
            .await
            .map_err(HandlerError::Remote)?;
        if let Some(pool_arn) = top_devices {
            response = response.with_data(DATA_TOP_DEVICES_POOL_ARN, &pool_arn);
        }

        Ok(response)
    }
}

#[async_trait]
impl<'a, C: DeviceFarmApi + ?Sized> ResourceHandler for ProjectHandler<'a, C> {
    fn schema(&self) -> &'static PropertySchema {
        &PROJECT_SCHEMA
    }

    async fn create(&self, properties: &ResourceProperties) -> Result<HandlerResponse, HandlerError> {
        let params = CreateProjectParams {
            name: required_string(properties, "Name")?,
        };

        let arn = self
            .client
            .create_project(&params)
            .await
            .map_err(HandlerError::Remote)?;
        tracing::info!("Created project {} ({})", params.name, arn);

        self.describe(&arn).await
    }

    async fn update(
        &self,
        arn: &str,
        properties: &ResourceProperties,
    ) -> Result<HandlerResponse, HandlerError> {
        let params = UpdateProjectParams {
            arn: arn.to_string(),
            name: required_string(properties, "Name")?,
        };

        self.client
            .update_project(&params)
            .await
            .map_err(HandlerError::Remote)?;
        tracing::info!("Updated project {}", arn);

        self.describe(arn).await
    }

    async fn delete(&self, arn: &str) -> Result<HandlerResponse, HandlerError> {
        self.client
            .delete_project(arn)
            .await
            .map_err(HandlerError::Remote)?;
        tracing::info!("Deleted project {}", arn);

        Ok(HandlerResponse::new(arn))
    }
}
