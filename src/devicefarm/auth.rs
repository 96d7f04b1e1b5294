//! AWS Authentication
//!
//! Resolves credentials from the environment and signs Device Farm requests
//! with AWS Signature Version 4.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;

/// Signing algorithm identifier
const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service name used in the credential scope
pub const SERVICE_NAME: &str = "devicefarm";

type HmacSha256 = Hmac<Sha256>;

/// AWS credentials
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    secret_access_key: String,
    pub session_token: Option<String>,
}

// Keep the secret out of logs
impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AwsCredentials {
    pub fn new(access_key_id: &str, secret_access_key: &str, session_token: Option<&str>) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: session_token.map(str::to_string),
        }
    }

    /// Load credentials from the standard AWS environment variables
    pub fn from_env() -> Result<Self> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")
            .context("AWS_ACCESS_KEY_ID is not set")?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .context("AWS_SECRET_ACCESS_KEY is not set")?;
        let session_token = std::env::var("AWS_SESSION_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }
}

/// Headers to attach to a signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub security_token: Option<String>,
}

/// A request to sign. Only the parts covered by the signature are needed.
pub struct SigningRequest<'a> {
    pub host: &'a str,
    pub content_type: &'a str,
    pub target: &'a str,
    pub body: &'a [u8],
}

/// Sign a POST to `/` for the given region
pub fn sign_request(
    credentials: &AwsCredentials,
    region: &str,
    request: &SigningRequest<'_>,
    now: DateTime<Utc>,
) -> Result<SignedHeaders> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    let mut headers: Vec<(&str, &str)> = vec![
        ("content-type", request.content_type),
        ("host", request.host),
        ("x-amz-date", amz_date.as_str()),
        ("x-amz-target", request.target),
    ];
    if let Some(token) = credentials.session_token.as_deref() {
        headers.push(("x-amz-security-token", token));
    }
    headers.sort_by(|a, b| a.0.cmp(b.0));

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "POST\n/\n\n{}\n{}\n{}",
        canonical_headers,
        signed_headers,
        sha256_hex(request.body)
    );

    let scope = format!("{}/{}/{}/aws4_request", date, region, SERVICE_NAME);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let k_date = hmac_sha256(
        format!("AWS4{}", credentials.secret_access_key).as_bytes(),
        date.as_bytes(),
    )?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, SERVICE_NAME.as_bytes())?;
    let k_signing = hmac_sha256(&k_service, b"aws4_request")?;
    let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes())?);

    Ok(SignedHeaders {
        authorization: format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, credentials.access_key_id, scope, signed_headers, signature
        ),
        amz_date,
        security_token: credentials.session_token.clone(),
    })
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| anyhow::anyhow!("Invalid signing key: {}", e))?;
    mac.update(message);

    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(body: &[u8]) -> SigningRequest<'_> {
        SigningRequest {
            host: "devicefarm.us-west-2.amazonaws.com",
            content_type: "application/x-amz-json-1.1",
            target: "DeviceFarm_20150623.CreateProject",
            body,
        }
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_empty_payload_hash() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_signature_shape() {
        let creds = AwsCredentials::new("AKIDEXAMPLE", "secret", None);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let signed = sign_request(&creds, "us-west-2", &request(b"{}"), now).unwrap();

        assert_eq!(signed.amz_date, "20240301T123000Z");
        assert!(signed.authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240301/us-west-2/devicefarm/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date;x-amz-target, Signature="
        ));
        let signature = signed.authorization.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signed.security_token.is_none());
    }

    #[test]
    fn test_signature_is_deterministic_and_body_sensitive() {
        let creds = AwsCredentials::new("AKIDEXAMPLE", "secret", None);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let a = sign_request(&creds, "us-west-2", &request(b"{\"name\":\"a\"}"), now).unwrap();
        let b = sign_request(&creds, "us-west-2", &request(b"{\"name\":\"a\"}"), now).unwrap();
        let c = sign_request(&creds, "us-west-2", &request(b"{\"name\":\"b\"}"), now).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.authorization, c.authorization);
    }

    #[test]
    fn test_session_token_is_signed() {
        let creds = AwsCredentials::new("AKIDEXAMPLE", "secret", Some("token"));
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let signed = sign_request(&creds, "us-west-2", &request(b"{}"), now).unwrap();
        assert!(signed
            .authorization
            .contains("SignedHeaders=content-type;host;x-amz-date;x-amz-security-token;x-amz-target"));
        assert_eq!(signed.security_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_signature_matches_reference() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let body = br#"{"name":"my-project"}"#;

        let creds = AwsCredentials::new("AKIDEXAMPLE", "secret", None);
        let signed = sign_request(&creds, "us-west-2", &request(body), now).unwrap();
        assert_eq!(
            signed.authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240301/us-west-2/devicefarm/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date;x-amz-target, \
             Signature=bd2c2deda963776692779721fda5c5ae674bcf6eb1590d3fa0a22d1c37ef6d87"
        );

        let creds = AwsCredentials::new("AKIDEXAMPLE", "secret", Some("token"));
        let signed = sign_request(&creds, "us-west-2", &request(body), now).unwrap();
        assert!(signed.authorization.ends_with(
            "Signature=98a5b352460c74fdc4e80623446313c3bd07831a1ffa59c155e57a17acdeba59"
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = AwsCredentials::new("AKIDEXAMPLE", "super-secret", Some("tok"));
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("tok\""));
    }
}
