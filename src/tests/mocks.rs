//! Mock implementations for testing

use crate::client::{ApiClient, ApiResponse};
use crate::config::ClientConfig;
use crate::error::{PrintBayError, Result};
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Simple mock API client with canned per-endpoint responses.
#[derive(Debug, Clone)]
pub struct MockApiClient {
    config: ClientConfig,
    /// Canned responses keyed by endpoint
    responses: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    /// Endpoints that should fail with an API error
    failures: Arc<Mutex<Vec<String>>>,
    /// Number of requests seen per endpoint
    counts: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            responses: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
            counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn add_response(&self, endpoint: &str, response: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push((endpoint.to_string(), response));
    }

    /// Make every request to `endpoint` fail with a server error.
    pub fn fail_endpoint(&self, endpoint: &str) {
        self.failures.lock().unwrap().push(endpoint.to_string());
    }

    pub fn request_count(&self, endpoint: &str) -> usize {
        self.counts
            .lock()
            .unwrap()
            .get(endpoint)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient for MockApiClient {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn request<T, R>(
        &self,
        _method: Method,
        endpoint: &str,
        _payload: Option<&T>,
    ) -> Result<ApiResponse<R>>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        *self
            .counts
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_insert(0) += 1;

        if self.failures.lock().unwrap().iter().any(|e| e == endpoint) {
            return Err(PrintBayError::api(
                500,
                format!("mock failure for {}", endpoint),
            ));
        }

        let canned = {
            let responses = self.responses.lock().unwrap();
            responses
                .iter()
                .find(|(ep, _)| ep == endpoint)
                .map(|(_, response)| response.clone())
        };

        let data = match canned {
            Some(value) => Some(
                serde_json::from_value::<R>(value)
                    .map_err(|e| PrintBayError::serialization(e.to_string()))?,
            ),
            None => None,
        };

        Ok(ApiResponse {
            success: true,
            data,
            message: None,
            error: None,
            timestamp: chrono::Utc::now(),
        })
    }
}
