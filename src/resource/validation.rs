//! Property validation
//!
//! Each resource type declares which properties are mandatory and which are
//! known. Mandatory checks apply to Create and Update; unknown keys are
//! rejected for every request type.

use super::error::ValidationError;
use super::event::{RequestType, ResourceProperties};
use crate::devicefarm::api::DevicePoolRule;
use serde_json::Value;

/// Property rules for one resource type
#[derive(Debug)]
pub struct PropertySchema {
    pub resource_type: &'static str,
    /// Checked in this order; the first missing one is reported
    pub mandatory: &'static [&'static str],
    pub known: &'static [&'static str],
}

impl PropertySchema {
    pub fn validate(
        &self,
        request_type: &RequestType,
        properties: &ResourceProperties,
    ) -> Result<(), ValidationError> {
        if matches!(request_type, RequestType::Create | RequestType::Update) {
            for name in self.mandatory {
                if properties.get(*name).map_or(true, is_empty_value) {
                    return Err(ValidationError::MissingProperty(*name));
                }
            }
        }

        let mut unknown: Vec<String> = properties
            .keys()
            .filter(|key| !self.known.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(ValidationError::UnknownProperties(unknown));
        }

        Ok(())
    }
}

/// Null, empty strings and empty collections count as "not set"
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidProperty {
        name,
        reason: reason.into(),
    }
}

/// Optional string property; null counts as absent
pub fn optional_string(
    properties: &ResourceProperties,
    name: &'static str,
) -> Result<Option<String>, ValidationError> {
    match properties.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid(name, format!("expected a string, got {}", other))),
    }
}

/// Mandatory string property
pub fn required_string(
    properties: &ResourceProperties,
    name: &'static str,
) -> Result<String, ValidationError> {
    match optional_string(properties, name)? {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::MissingProperty(name)),
    }
}

/// Optional positive count. The framework passes scalars as strings, so
/// `"5"` and `5` are both accepted.
pub fn optional_count(
    properties: &ResourceProperties,
    name: &'static str,
) -> Result<Option<u32>, ValidationError> {
    let parsed = match properties.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    match parsed.and_then(|n| u32::try_from(n).ok()) {
        Some(n) if n > 0 => Ok(Some(n)),
        _ => Err(invalid(name, "expected a positive integer")),
    }
}

/// Mandatory list of device pool rules
pub fn required_rules(
    properties: &ResourceProperties,
    name: &'static str,
) -> Result<Vec<DevicePoolRule>, ValidationError> {
    let value = properties
        .get(name)
        .filter(|v| !is_empty_value(v))
        .ok_or(ValidationError::MissingProperty(name))?;

    serde_json::from_value(value.clone()).map_err(|e| invalid(name, e.to_string()))
}
