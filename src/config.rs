//! Configuration Management
//!
//! Resolves the Device Farm endpoint, region and timeout from CLI flags,
//! environment variables and an optional config file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Device Farm is only offered in us-west-2
pub const DEFAULT_REGION: &str = "us-west-2";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// AWS region of the Device Farm endpoint
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override (local emulators, proxies)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("devicefarm-resources").join("config.json"))
    }

    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file {:?}: {:#}", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Apply environment overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides using the given lookup
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = non_empty("DEVICEFARM_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if let Some(region) = non_empty("DEVICEFARM_REGION").or_else(|| non_empty("AWS_REGION")) {
            self.region = Some(region);
        }
        self
    }

    /// Apply CLI overrides
    pub fn with_overrides(mut self, region: Option<String>, endpoint: Option<String>) -> Self {
        if region.is_some() {
            self.region = region;
        }
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
        self
    }

    /// Get effective region (override > default)
    pub fn effective_region(&self) -> Result<String> {
        let region = self
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        if !validate_region(&region) {
            return Err(anyhow::anyhow!("Invalid region name: {:?}", region));
        }
        Ok(region)
    }

    /// Get effective endpoint URL (override > regional default)
    pub fn effective_endpoint(&self) -> Result<Url> {
        let raw = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://devicefarm.{}.amazonaws.com/", self.effective_region()?),
        };

        let url = Url::parse(&raw).with_context(|| format!("Invalid endpoint URL: {}", raw))?;
        if url.host_str().is_none() {
            return Err(anyhow::anyhow!("Endpoint URL has no host: {}", raw));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Validate an AWS region name such as `us-west-2`
/// Lowercase letters, digits and hyphens; no leading or trailing hyphen
fn validate_region(region: &str) -> bool {
    if region.is_empty() || region.len() > 32 {
        return false;
    }
    if region.starts_with('-') || region.ends_with('-') {
        return false;
    }
    region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
