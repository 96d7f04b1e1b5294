//! Device pool resource
//!
//! Device pools are named sets of device rules scoped to a project.

use super::event::{HandlerResponse, ResourceProperties};
use super::validation::{
    optional_count, optional_string, required_rules, required_string, PropertySchema,
};
use super::{HandlerError, ResourceHandler};
use crate::devicefarm::api::{
    CreateDevicePoolParams, DeviceFarmApi, FieldUpdate, UpdateDevicePoolParams,
};
use async_trait::async_trait;

pub static DEVICE_POOL_SCHEMA: PropertySchema = PropertySchema {
    resource_type: "DevicePool",
    mandatory: &["ProjectArn", "Name", "Rules"],
    known: &[
        "Name",
        "Rules",
        "ProjectArn",
        "Description",
        "MaxDevices",
        "ServiceToken",
    ],
};

/// Handler for Device Farm device pools
pub struct DevicePoolHandler<'a, C: DeviceFarmApi + ?Sized> {
    client: &'a C,
}

impl<'a, C: DeviceFarmApi + ?Sized> DevicePoolHandler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<'a, C: DeviceFarmApi + ?Sized> ResourceHandler for DevicePoolHandler<'a, C> {
    fn schema(&self) -> &'static PropertySchema {
        &DEVICE_POOL_SCHEMA
    }

    async fn create(&self, properties: &ResourceProperties) -> Result<HandlerResponse, HandlerError> {
        let params = CreateDevicePoolParams {
            project_arn: required_string(properties, "ProjectArn")?,
            name: required_string(properties, "Name")?,
            rules: required_rules(properties, "Rules")?,
            description: optional_string(properties, "Description")?,
            max_devices: optional_count(properties, "MaxDevices")?,
        };

        let arn = self
            .client
            .create_device_pool(&params)
            .await
            .map_err(HandlerError::Remote)?;
        tracing::info!(
            "Created device pool {} in {} ({})",
            params.name,
            params.project_arn,
            arn
        );

        Ok(HandlerResponse::with_arn(&arn))
    }

    async fn update(
        &self,
        arn: &str,
        properties: &ResourceProperties,
    ) -> Result<HandlerResponse, HandlerError> {
        // ProjectArn is validated but cannot be changed in place
        required_string(properties, "ProjectArn")?;

        let description = match optional_string(properties, "Description")? {
            Some(description) => FieldUpdate::Set(description),
            None => FieldUpdate::Unchanged,
        };
        // An absent limit must clear the old one, not keep it
        let max_devices = match optional_count(properties, "MaxDevices")? {
            Some(n) => FieldUpdate::Set(n),
            None => FieldUpdate::Clear,
        };

        let params = UpdateDevicePoolParams {
            arn: arn.to_string(),
            name: required_string(properties, "Name")?,
            rules: required_rules(properties, "Rules")?,
            description,
            max_devices,
        };

        self.client
            .update_device_pool(&params)
            .await
            .map_err(HandlerError::Remote)?;
        tracing::info!("Updated device pool {}", arn);

        Ok(HandlerResponse::with_arn(arn))
    }

    async fn delete(&self, arn: &str) -> Result<HandlerResponse, HandlerError> {
        self.client
            .delete_device_pool(arn)
            .await
            .map_err(HandlerError::Remote)?;
        tracing::info!("Deleted device pool {}", arn);

        Ok(HandlerResponse::new(arn))
    }
}
