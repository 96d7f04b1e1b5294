//! Device Farm API surface
//!
//! The operations the resource handlers need from Device Farm, expressed as
//! an async trait so the HTTP client can be swapped for a test double.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Device pool type used when listing pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DevicePoolType {
    Curated,
    Private,
}

/// Three-state value for optional fields in update calls
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Replace the field with this value
    Set(T),
    /// Remove a previously set value
    Clear,
    /// Leave the field as it is
    #[default]
    Unchanged,
}

impl<T> FieldUpdate<T> {
    /// The value to send, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, FieldUpdate::Clear)
    }
}

/// A single device pool rule, forwarded to the service verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevicePoolRule {
    #[serde(alias = "Attribute")]
    pub attribute: String,
    #[serde(alias = "Operator")]
    pub operator: String,
    #[serde(alias = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProjectParams {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateProjectParams {
    pub arn: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevicePoolParams {
    pub project_arn: String,
    pub name: String,
    pub rules: Vec<DevicePoolRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_devices: Option<u32>,
}

/// Update call for a device pool.
///
/// `description` and `max_devices` carry three states; the wire form is
/// produced by [`UpdateDevicePoolParams::to_request_body`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDevicePoolParams {
    pub arn: String,
    pub name: String,
    pub rules: Vec<DevicePoolRule>,
    pub description: FieldUpdate<String>,
    pub max_devices: FieldUpdate<u32>,
}

impl UpdateDevicePoolParams {
    /// Build the JSON body for `UpdateDevicePool`
    pub fn to_request_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "arn": self.arn,
            "name": self.name,
            "rules": self.rules,
        });
        if let serde_json::Value::Object(ref mut map) = body {
            if let Some(description) = self.description.value() {
                map.insert("description".into(), description.clone().into());
            }
            match &self.max_devices {
                FieldUpdate::Set(n) => {
                    map.insert("maxDevices".into(), (*n).into());
                }
                FieldUpdate::Clear => {
                    map.insert("clearMaxDevices".into(), true.into());
                }
                FieldUpdate::Unchanged => {}
            }
        }
        body
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDevicePoolsParams {
    pub arn: String,
    #[serde(rename = "type")]
    pub pool_type: DevicePoolType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Device pool entry as returned by `ListDevicePools`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DevicePoolSummary {
    pub arn: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub pool_type: Option<DevicePoolType>,
}

/// One page of `ListDevicePools`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePoolPage {
    #[serde(default)]
    pub device_pools: Vec<DevicePoolSummary>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Remote operations used by the resource handlers.
///
/// Create calls return the ARN assigned by the service.
#[async_trait]
pub trait DeviceFarmApi: Send + Sync {
    async fn create_project(&self, params: &CreateProjectParams) -> Result<String>;
    async fn update_project(&self, params: &UpdateProjectParams) -> Result<()>;
    async fn delete_project(&self, arn: &str) -> Result<()>;

    async fn create_device_pool(&self, params: &CreateDevicePoolParams) -> Result<String>;
    async fn update_device_pool(&self, params: &UpdateDevicePoolParams) -> Result<()>;
    async fn delete_device_pool(&self, arn: &str) -> Result<()>;

    /// Fetch one page of device pools
    async fn list_device_pools(&self, params: &ListDevicePoolsParams) -> Result<DevicePoolPage>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule() -> DevicePoolRule {
        DevicePoolRule {
            attribute: "PLATFORM".into(),
            operator: "EQUALS".into(),
            value: "\"ANDROID\"".into(),
        }
    }

    #[test]
    fn update_body_clears_max_devices() {
        let params = UpdateDevicePoolParams {
            arn: "arn:pool".into(),
            name: "pool".into(),
            rules: vec![rule()],
            description: FieldUpdate::Unchanged,
            max_devices: FieldUpdate::Clear,
        };
        let body = params.to_request_body();
        assert_eq!(body["clearMaxDevices"], json!(true));
        assert!(body.get("maxDevices").is_none());
        assert!(body.get("description").is_none());
    }

    #[test]
    fn update_body_sets_max_devices() {
        let params = UpdateDevicePoolParams {
            arn: "arn:pool".into(),
            name: "pool".into(),
            rules: vec![rule()],
            description: FieldUpdate::Set("phones".into()),
            max_devices: FieldUpdate::Set(5),
        };
        let body = params.to_request_body();
        assert_eq!(body["maxDevices"], json!(5));
        assert_eq!(body["description"], json!("phones"));
        assert!(body.get("clearMaxDevices").is_none());
        assert_eq!(body["rules"][0]["attribute"], json!("PLATFORM"));
    }

    #[test]
    fn create_body_omits_absent_optionals() {
        let params = CreateDevicePoolParams {
            project_arn: "arn:project".into(),
            name: "pool".into(),
            rules: vec![rule()],
            description: None,
            max_devices: None,
        };
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(
            body,
            json!({
                "projectArn": "arn:project",
                "name": "pool",
                "rules": [{"attribute": "PLATFORM", "operator": "EQUALS", "value": "\"ANDROID\""}],
            })
        );
    }

    #[test]
    fn rule_accepts_pascal_case_keys() {
        let parsed: DevicePoolRule = serde_json::from_value(json!({
            "Attribute": "PLATFORM",
            "Operator": "EQUALS",
            "Value": "\"IOS\"",
        }))
        .unwrap();
        assert_eq!(parsed.attribute, "PLATFORM");
        assert_eq!(parsed.value, "\"IOS\"");
    }

    #[test]
    fn page_tolerates_missing_fields() {
        let page: DevicePoolPage = serde_json::from_value(json!({
            "devicePools": [{"arn": "arn:a", "name": "Top Devices", "type": "CURATED"}]
        }))
        .unwrap();
        assert_eq!(page.device_pools.len(), 1);
        assert_eq!(page.device_pools[0].pool_type, Some(DevicePoolType::Curated));
        assert!(page.next_token.is_none());
    }
}
