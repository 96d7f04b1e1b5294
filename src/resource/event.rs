//! Lifecycle events and handler responses
//!
//! Wire shapes exchanged with the provisioning framework. Keys are PascalCase
//! on the wire; envelope fields the handlers do not use are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Desired properties of one resource
pub type ResourceProperties = Map<String, Value>;

/// Data key carrying the resource ARN
pub const DATA_ARN: &str = "Arn";

/// Lifecycle request kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
    /// Anything else; rejected at dispatch
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::Create => write!(f, "Create"),
            RequestType::Update => write!(f, "Update"),
            RequestType::Delete => write!(f, "Delete"),
            RequestType::Other(other) => write!(f, "{}", other),
        }
    }
}

/// A lifecycle event for a single resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: RequestType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: ResourceProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_resource_id: Option<String>,
}

impl LifecycleEvent {
    pub fn new(request_type: RequestType, resource_properties: ResourceProperties) -> Self {
        Self {
            request_type,
            physical_resource_id: None,
            resource_properties,
            request_id: None,
            logical_resource_id: None,
        }
    }

    pub fn with_physical_resource_id(mut self, id: &str) -> Self {
        self.physical_resource_id = Some(id.to_string());
        self
    }

    /// Non-empty PhysicalResourceId, if the event carries one
    pub fn existing_id(&self) -> Option<&str> {
        self.physical_resource_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Result returned to the provisioning framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HandlerResponse {
    pub physical_resource_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl HandlerResponse {
    /// Response that only echoes the identifier (Delete)
    pub fn new(physical_resource_id: &str) -> Self {
        Self {
            physical_resource_id: physical_resource_id.to_string(),
            data: BTreeMap::new(),
        }
    }

    /// Response whose data carries the ARN
    pub fn with_arn(arn: &str) -> Self {
        Self::new(arn).with_data(DATA_ARN, arn)
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}
