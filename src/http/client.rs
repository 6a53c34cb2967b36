//! HTTP client for the Likee endpoints
//!
//! Provides a thin reqwest wrapper that handles:
//! - JSON and form-encoded POST bodies
//! - Status and timeout classification
//! - Page source and video downloads

use super::transport::Transport;
use crate::config::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::types::{value_to_text, Encoding, JsonObject, JsonValue};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            default_headers: HashMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client issuing single, non-retried requests
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// POST a payload and decode the JSON response body.
    ///
    /// Any status other than 200 is an error, as is a body that is not JSON.
    pub async fn post(
        &self,
        url: &str,
        encoding: Encoding,
        payload: &JsonObject,
    ) -> Result<JsonValue> {
        debug!("POST {} ({})", url, encoding.content_type());
        let mut req = self.with_headers(self.client.post(url));
        req = match encoding {
            Encoding::Json => req.json(payload),
            Encoding::Form => req.form(&form_pairs(payload)),
        };

        let response = req.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        debug!("POST {} succeeded ({} bytes)", url, text.len());
        serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("Response from {url} is not JSON: {e}")))
    }

    /// GET a page and return its body as text
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .with_headers(self.client.get(url))
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(status.as_u16(), String::new()));
        }
        response.text().await.map_err(|e| self.classify(e))
    }

    /// GET a URL and write the body to `path`, returning the bytes written
    pub async fn download(&self, url: &str, path: &Path) -> Result<u64> {
        let response = self
            .with_headers(self.client.get(url))
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(status.as_u16(), String::new()));
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        tokio::fs::write(path, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(bytes.len() as u64)
    }

    fn with_headers(&self, mut req: RequestBuilder) -> RequestBuilder {
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req
    }

    /// Map a reqwest failure onto the crate error, keeping timeouts distinct
    fn classify(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn call(&self, endpoint: &str, encoding: Encoding, payload: &JsonObject) -> JsonObject {
        match self.post(endpoint, encoding, payload).await {
            Ok(JsonValue::Object(body)) => body,
            Ok(other) => {
                warn!(
                    "Unexpected response shape from {}: expected object, got {}",
                    endpoint,
                    json_kind(&other)
                );
                JsonObject::new()
            }
            Err(Error::HttpStatus { status, .. }) => {
                warn!("HTTP error {} from {}", status, endpoint);
                JsonObject::new()
            }
            Err(Error::Timeout { timeout_ms }) => {
                warn!("Request to {} timed out after {}ms", endpoint, timeout_ms);
                JsonObject::new()
            }
            Err(e) => {
                warn!("Request to {} failed: {}", endpoint, e);
                JsonObject::new()
            }
        }
    }
}

/// Flatten a payload into form fields.
///
/// Scalars are written as text; nested values are sent as JSON text.
pub fn form_pairs(payload: &JsonObject) -> Vec<(String, String)> {
    payload
        .iter()
        .map(|(key, value)| (key.clone(), value_to_text(value)))
        .collect()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
