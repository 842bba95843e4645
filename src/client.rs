//! HTTP client for the PrintBay farm API

use chrono::{DateTime, Utc};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{PrintBayError, Result};

/// API response wrapper
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, converting a missing body into an API error.
    pub fn into_data(self) -> Result<T> {
        self.data
            .ok_or_else(|| PrintBayError::invalid_response("Response body missing data field"))
    }
}

/// Client seam for all farm API operations.
///
/// Services are generic over this trait so tests can substitute a mock
/// with canned responses instead of a live server.
pub trait ApiClient {
    fn config(&self) -> &ClientConfig;

    fn request<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> impl std::future::Future<Output = Result<ApiResponse<R>>> + Send
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send;
}

/// HTTP client backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self { client, config })
    }

    /// Cheap reachability probe against the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        let url = self.config.endpoint_url("health");
        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PrintBayError::api(
                response.status().as_u16(),
                "Health check failed",
            ))
        }
    }
}

impl ApiClient for HttpClient {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn request<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> Result<ApiResponse<R>>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!(%method, %url, "api request");

        let mut request_builder = self
            .client
            .request(method, &url)
            .header("Content-Type", "application/json");

        if let Some(key) = &self.config.api_key {
            request_builder = request_builder.header("Authorization", format!("Bearer {}", key));
        }

        if let Some(data) = payload {
            request_builder = request_builder.json(data);
        }

        let response = request_builder.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if status.as_u16() == 403 {
            let detail = serde_json::from_str::<ApiResponse<R>>(&response_text)
                .ok()
                .and_then(|r| r.error.or(r.message))
                .unwrap_or_else(|| "Insufficient permissions".to_string());
            return Err(PrintBayError::permission(detail));
        }

        match serde_json::from_str::<ApiResponse<R>>(&response_text) {
            Ok(api_response) => {
                if !api_response.success {
                    let error_message = api_response
                        .error
                        .or(api_response.message)
                        .unwrap_or_else(|| "Unknown API error".to_string());
                    return Err(PrintBayError::api(status.as_u16(), error_message));
                }
                Ok(api_response)
            }
            Err(_) => Err(PrintBayError::api(
                status.as_u16(),
                format!("Invalid API response: {}", response_text),
            )),
        }
    }
}
