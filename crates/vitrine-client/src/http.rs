//! HTTP client for the Postgres-via-REST backend
//!
//! Every request carries the service key both as `apikey` and as a bearer
//! token. Writes ask for `Prefer: return=representation` so the affected rows
//! come back in the response body.

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Backend base URL, e.g. `https://project.supabase.co`
    pub base_url: String,
    /// Service key used for both `apikey` and bearer authorization
    pub service_key: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds
    pub read_timeout_ms: u64,
    /// REST root below the base URL
    pub rest_path: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:54321".to_string(),
            service_key: String::new(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 15000,
            rest_path: "/rest/v1".to_string(),
        }
    }
}

impl RestClientConfig {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            service_key: service_key.to_string(),
            ..Default::default()
        }
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    pub fn with_rest_path(mut self, path: &str) -> Self {
        self.rest_path = path.to_string();
        self
    }
}

/// Raw request surface of the REST backend, keyed by a collection path with
/// row filters (see [`crate::RestQuery`]).
///
/// Implemented by [`RestHttpClient`]; tests substitute scripted backends.
#[async_trait]
pub trait RestBackend: Send + Sync {
    /// GET rows.
    async fn select(&self, path: &str) -> Result<Value>;

    /// POST a row, returning the inserted representation.
    async fn insert(&self, path: &str, body: &Value) -> Result<Value>;

    /// PATCH matching rows, returning the updated representation.
    async fn update(&self, path: &str, body: &Value) -> Result<Value>;

    /// DELETE matching rows.
    async fn delete(&self, path: &str) -> Result<Value>;
}

/// reqwest-based REST client
pub struct RestHttpClient {
    client: Client,
    config: RestClientConfig,
}

impl RestHttpClient {
    pub fn new(config: RestClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.service_key)
            .map_err(|e| ClientError::Config(format!("service key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key))
            .map_err(|e| ClientError::Config(format!("service key: {}", e)))?;
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Build full URL from the base URL, the REST root and the request path
    fn build_url(&self, path: &str) -> String {
        let base_url = self.config.base_url.trim_end_matches('/');
        let rest_path = self.config.rest_path.trim_end_matches('/');

        if rest_path.is_empty() {
            format!("{}{}", base_url, path)
        } else {
            format!("{}/{}{}", base_url, rest_path.trim_start_matches('/'), path)
        }
    }

    async fn send(&self, method: &'static str, path: &str, request: RequestBuilder) -> Result<Value> {
        debug!(method, path, "Sending REST request");

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(method, path, status = status.as_u16(), body = %body, "REST request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RestBackend for RestHttpClient {
    async fn select(&self, path: &str) -> Result<Value> {
        let request = self.client.get(self.build_url(path));
        self.send("GET", path, request).await
    }

    async fn insert(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self
            .client
            .post(self.build_url(path))
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(body);
        self.send("POST", path, request).await
    }

    async fn update(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self
            .client
            .patch(self.build_url(path))
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(body);
        self.send("PATCH", path, request).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        let request = self.client.delete(self.build_url(path));
        self.send("DELETE", path, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RestClientConfig::default();
        assert_eq!(config.rest_path, "/rest/v1");
        assert_eq!(config.connect_timeout_ms, 5000);
        assert_eq!(config.read_timeout_ms, 15000);
    }

    #[test]
    fn test_config_builder() {
        let config = RestClientConfig::new("https://db.example.com", "secret")
            .with_timeouts(1000, 2000)
            .with_rest_path("/api");

        assert_eq!(config.base_url, "https://db.example.com");
        assert_eq!(config.service_key, "secret");
        assert_eq!(config.connect_timeout_ms, 1000);
        assert_eq!(config.read_timeout_ms, 2000);
        assert_eq!(config.rest_path, "/api");
    }

    #[test]
    fn test_build_url() {
        let client =
            RestHttpClient::new(RestClientConfig::new("https://db.example.com/", "key")).unwrap();
        assert_eq!(
            client.build_url("/service_faqs?limit=1"),
            "https://db.example.com/rest/v1/service_faqs?limit=1"
        );
    }

    #[test]
    fn test_build_url_without_rest_root() {
        let config = RestClientConfig::new("http://localhost:3000", "key").with_rest_path("");
        let client = RestHttpClient::new(config).unwrap();
        assert_eq!(
            client.build_url("/service_blogs"),
            "http://localhost:3000/service_blogs"
        );
    }

    #[test]
    fn test_invalid_service_key_is_rejected() {
        let result = RestHttpClient::new(RestClientConfig::new("http://localhost", "bad\nkey"));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
