//! HTTP utilities for Device Farm JSON API calls

use super::auth::SignedHeaders;
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Content type of the AWS JSON 1.1 protocol
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Error returned by the Device Farm API for a non-success status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Device Farm API request failed: {status} {code}: {message}")]
pub struct RemoteApiError {
    pub status: u16,
    /// Exception name, e.g. `NotFoundException`
    pub code: String,
    pub message: String,
}

impl RemoteApiError {
    fn from_body(status: u16, body: &str) -> Self {
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

        // "__type" may be namespaced: "com.amazonaws.devicefarm#NotFoundException"
        let code = parsed
            .get("__type")
            .and_then(|v| v.as_str())
            .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
            .unwrap_or_else(|| "UnknownError".to_string());
        let message = parsed
            .get("message")
            .or_else(|| parsed.get("Message"))
            .and_then(|v| v.as_str())
            .unwrap_or("no error message returned")
            .to_string();

        Self {
            status,
            code,
            message,
        }
    }
}

/// HTTP client wrapper for Device Farm API calls
#[derive(Clone)]
pub struct DeviceFarmHttpClient {
    client: Client,
}

impl DeviceFarmHttpClient {
    /// Create a new HTTP client
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("devicefarm-resources/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// POST a signed JSON 1.1 request and return the parsed response
    pub async fn post(
        &self,
        url: &str,
        target: &str,
        body: Vec<u8>,
        signed: &SignedHeaders,
    ) -> Result<Value> {
        tracing::debug!("POST {} ({})", url, target);

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", target)
            .header("X-Amz-Date", &signed.amz_date)
            .header("Authorization", &signed.authorization);

        if let Some(token) = &signed.security_token {
            request = request.header("X-Amz-Security-Token", token);
        }

        let response = request
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!(
                "API error: {} - {}",
                status,
                sanitize_for_log(&response_body)
            );
            return Err(RemoteApiError::from_body(status.as_u16(), &response_body).into());
        }

        // Handle empty response
        if response_body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).context("Failed to parse response JSON")
    }
}
