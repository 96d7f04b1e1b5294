//! Recording test double for [`DeviceFarmApi`]

use crate::devicefarm::api::{
    CreateDevicePoolParams, CreateProjectParams, DeviceFarmApi, DevicePoolPage,
    DevicePoolSummary, DevicePoolType, ListDevicePoolsParams, UpdateDevicePoolParams,
    UpdateProjectParams,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

pub const PROJECT_ARN: &str = "arn:aws:devicefarm:us-west-2:123456789012:project:12345";
pub const PROJECT_ID: &str = "12345";
pub const DEVICE_POOL_ARN: &str =
    "arn:aws:devicefarm:us-west-2:123456789012:devicepool:12345/67890";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateProject(CreateProjectParams),
    UpdateProject(UpdateProjectParams),
    DeleteProject(String),
    CreateDevicePool(CreateDevicePoolParams),
    UpdateDevicePool(UpdateDevicePoolParams),
    DeleteDevicePool(String),
    ListDevicePools(ListDevicePoolsParams),
}

pub fn pool(arn: &str, name: &str) -> DevicePoolSummary {
    DevicePoolSummary {
        arn: arn.to_string(),
        name: name.to_string(),
        pool_type: Some(DevicePoolType::Curated),
    }
}

/// Records every call; list pages are chained with tokens `page-1`, `page-2`, ...
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    pages: Vec<Vec<DevicePoolSummary>>,
    failing: Option<&'static str>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            pages: Vec::new(),
            failing: None,
        }
    }

    pub fn with_pages(mut self, pages: Vec<Vec<DevicePoolSummary>>) -> Self {
        self.pages = pages;
        self
    }

    /// Make the named operation fail, e.g. `"CreateProject"`
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<ListDevicePoolsParams> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ListDevicePools(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn record(&self, operation: &str, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing == Some(operation) {
            return Err(anyhow::anyhow!("{} went wrong", operation));
        }
        Ok(())
    }
}

#[async_trait]
impl DeviceFarmApi for RecordingClient {
    async fn create_project(&self, params: &CreateProjectParams) -> Result<String> {
        self.record("CreateProject", Call::CreateProject(params.clone()))?;
        Ok(PROJECT_ARN.to_string())
    }

    async fn update_project(&self, params: &UpdateProjectParams) -> Result<()> {
        self.record("UpdateProject", Call::UpdateProject(params.clone()))
    }

    async fn delete_project(&self, arn: &str) -> Result<()> {
        self.record("DeleteProject", Call::DeleteProject(arn.to_string()))
    }

    async fn create_device_pool(&self, params: &CreateDevicePoolParams) -> Result<String> {
        self.record("CreateDevicePool", Call::CreateDevicePool(params.clone()))?;
        Ok(DEVICE_POOL_ARN.to_string())
    }

    async fn update_device_pool(&self, params: &UpdateDevicePoolParams) -> Result<()> {
        self.record("UpdateDevicePool", Call::UpdateDevicePool(params.clone()))
    }

    async fn delete_device_pool(&self, arn: &str) -> Result<()> {
        self.record("DeleteDevicePool", Call::DeleteDevicePool(arn.to_string()))
    }

    async fn list_device_pools(&self, params: &ListDevicePoolsParams) -> Result<DevicePoolPage> {
        self.record("ListDevicePools", Call::ListDevicePools(params.clone()))?;

        let index = match params.next_token.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| anyhow::anyhow!("bad token {}", token))?,
        };
        let device_pools = self.pages.get(index).cloned().unwrap_or_default();
        let next_token = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));

        Ok(DevicePoolPage {
            device_pools,
            next_token,
        })
    }
}
