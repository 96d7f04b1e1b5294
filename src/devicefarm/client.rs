//! Device Farm Client
//!
//! Main client for interacting with the Device Farm API, combining request
//! signing and HTTP functionality.

use super::api::{
    CreateDevicePoolParams, CreateProjectParams, DeviceFarmApi, DevicePoolPage,
    ListDevicePoolsParams, UpdateDevicePoolParams, UpdateProjectParams,
};
use super::auth::{self, AwsCredentials, SigningRequest};
use super::http::{DeviceFarmHttpClient, CONTENT_TYPE};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

/// Prefix of the `X-Amz-Target` header
const TARGET_PREFIX: &str = "DeviceFarm_20150623";

/// Main Device Farm client
#[derive(Clone)]
pub struct DeviceFarmClient {
    pub credentials: AwsCredentials,
    pub http: DeviceFarmHttpClient,
    pub endpoint: Url,
    pub region: String,
}

impl DeviceFarmClient {
    /// Create a new client using credentials from the environment
    pub fn new(config: &Config) -> Result<Self> {
        let credentials =
            AwsCredentials::from_env().context("Failed to load AWS credentials")?;
        Self::with_credentials(config, credentials)
    }

    /// Create a new client with explicit credentials
    pub fn with_credentials(config: &Config, credentials: AwsCredentials) -> Result<Self> {
        let endpoint = config.effective_endpoint()?;
        let region = config.effective_region()?;
        let http = DeviceFarmHttpClient::new(config.timeout())?;

        tracing::debug!("Device Farm endpoint: {} ({})", endpoint, region);

        Ok(Self {
            credentials,
            http,
            endpoint,
            region,
        })
    }

    /// `Host` header value, including a non-default port
    fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Invoke a Device Farm operation with a JSON body
    pub async fn call<T: Serialize + ?Sized>(&self, operation: &str, params: &T) -> Result<Value> {
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        let body = serde_json::to_vec(params).context("Failed to serialize request")?;
        let host = self.host();

        let signed = auth::sign_request(
            &self.credentials,
            &self.region,
            &SigningRequest {
                host: &host,
                content_type: CONTENT_TYPE,
                target: &target,
                body: &body,
            },
            chrono::Utc::now(),
        )?;

        self.http
            .post(self.endpoint.as_str(), &target, body, &signed)
            .await
            .with_context(|| format!("{} failed", operation))
    }
}

/// Pull the ARN out of a create response, e.g. `{"project": {"arn": ...}}`
fn extract_arn(response: &Value, entity: &str) -> Result<String> {
    response
        .get(entity)
        .and_then(|v| v.get("arn"))
        .and_then(|v| v.as_str())
        .filter(|arn| !arn.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Response has no {}.arn", entity))
}

#[async_trait]
impl DeviceFarmApi for DeviceFarmClient {
    async fn create_project(&self, params: &CreateProjectParams) -> Result<String> {
        let response = self.call("CreateProject", params).await?;
        extract_arn(&response, "project")
    }

    async fn update_project(&self, params: &UpdateProjectParams) -> Result<()> {
        self.call("UpdateProject", params).await?;
        Ok(())
    }

    async fn delete_project(&self, arn: &str) -> Result<()> {
        self.call("DeleteProject", &json!({ "arn": arn })).await?;
        Ok(())
    }

    async fn create_device_pool(&self, params: &CreateDevicePoolParams) -> Result<String> {
        let response = self.call("CreateDevicePool", params).await?;
        extract_arn(&response, "devicePool")
    }

    async fn update_device_pool(&self, params: &UpdateDevicePoolParams) -> Result<()> {
        self.call("UpdateDevicePool", &params.to_request_body())
            .await?;
        Ok(())
    }

    async fn delete_device_pool(&self, arn: &str) -> Result<()> {
        self.call("DeleteDevicePool", &json!({ "arn": arn })).await?;
        Ok(())
    }

    async fn list_device_pools(&self, params: &ListDevicePoolsParams) -> Result<DevicePoolPage> {
        let response = self.call("ListDevicePools", params).await?;
        serde_json::from_value(response).context("Failed to parse ListDevicePools response")
    }
}
