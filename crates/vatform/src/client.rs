//! Validation endpoint client.
//!
//! The endpoint answers with a JSON document whose top-level value is a
//! *string* holding the actual result object, so every response is decoded
//! twice. Existing deployments depend on this encoding.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Path of the validation route, relative to the site root.
pub const VALIDATE_PATH: &str = "/wp-json/vat/validate";

/// Request body sent to the validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatRequest {
    /// Lowercase two-letter country code.
    pub country_code: String,

    /// Sanitized identifier.
    pub vat_number: String,
}

impl VatRequest {
    pub fn new(country_code: impl Into<String>, vat_number: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            vat_number: vat_number.into(),
        }
    }
}

/// Registry lookup result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the registry knows the identifier. Absent or null counts as false.
    #[serde(default, deserialize_with = "null_as_false")]
    pub valid: bool,

    /// Registered name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Registered address: usually a multi-line string, sometimes structured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,

    /// Registry-side timestamp of the lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_date: Option<String>,
}

impl ValidationResult {
    /// The registered name when the identifier is valid and a name was given.
    pub fn registered_name(&self) -> Option<&str> {
        if !self.valid {
            return None;
        }
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Address lines, whatever shape the registry sent the address in.
    pub fn address_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(address) = &self.address {
            collect_address_lines(address, &mut lines);
        }
        lines
    }
}

fn collect_address_lines(value: &Value, lines: &mut Vec<String>) {
    match value {
        Value::String(text) => lines.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        ),
        Value::Number(n) => lines.push(n.to_string()),
        Value::Array(items) => items.iter().for_each(|item| collect_address_lines(item, lines)),
        Value::Object(fields) => fields
            .values()
            .for_each(|field| collect_address_lines(field, lines)),
        Value::Null | Value::Bool(_) => {}
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Decode a response body: outer JSON string, then the object inside it.
pub fn decode_response(body: &str) -> ClientResult<ValidationResult> {
    let outer: String = serde_json::from_str(body)?;
    let inner: Value = serde_json::from_str(&outer)?;
    if !inner.is_object() {
        return Err(ClientError::NotAnObject);
    }
    Ok(serde_json::from_value(inner)?)
}

/// A transport able to run one validation round trip.
#[async_trait]
pub trait ValidationClient: Send + Sync {
    /// Send the request and decode the endpoint's answer.
    async fn validate(&self, request: &VatRequest) -> ClientResult<ValidationResult>;
}

/// HTTP client for the validation endpoint.
#[derive(Clone)]
pub struct HttpValidationClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpValidationClient {
    /// Create a client for the site at `base_url`.
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vatform/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint_url(base_url),
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ValidationClient for HttpValidationClient {
    async fn validate(&self, request: &VatRequest) -> ClientResult<ValidationResult> {
        let payload = serde_json::to_string(request)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "validation response received");

        decode_response(&body)
    }
}

impl std::fmt::Debug for HttpValidationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpValidationClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn endpoint_url(base_url: &str) -> String {
    format!("{}{VALIDATE_PATH}", base_url.trim_end_matches('/'))
}
