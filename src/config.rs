//! Configuration management for the PrintBay CLI and SDK

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{PrintBayError, Result};

/// Persisted CLI configuration, written as JSON under the user config dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub endpoint: String,
    pub timeout: u64,
    pub verbose: bool,
    pub api_key: Option<String>,
    pub default_printer: Option<i64>,
    pub storage_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8883/api".to_string(),
            timeout: 30,
            verbose: false,
            api_key: None,
            default_printer: None,
            storage_dir: default_storage_dir(),
        }
    }
}

impl AppConfig {
    pub async fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        if config_file.exists() {
            let content = fs::read_to_string(&config_file).await?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => Ok(config),
                Err(_) => {
                    // Unreadable config is replaced with defaults rather
                    // than blocking every command.
                    let config = Self::default();
                    config.save(&config_file).await?;
                    Ok(config)
                }
            }
        } else {
            let config = Self::default();
            config.save(&config_file).await?;
            Ok(config)
        }
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    /// Derive the SDK client configuration from the CLI configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfigBuilder::new()
            .base_url(&self.endpoint)
            .timeout(self.timeout)
            .verbose(self.verbose)
            .api_key(self.api_key.clone())
            .build()
            .unwrap_or_else(|_| ClientConfig::default())
    }
}

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("printbay")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("printbay")
}

/// Client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8883/api".to_string(),
            timeout: default_timeout(),
            verbose: false,
            api_key: None,
        }
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<u64>,
    verbose: Option<bool>,
    api_key: Option<Option<String>>,
    config_file: Option<PathBuf>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_file_and_env(self.config_file.as_deref())?;

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }
        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }

        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    pub fn new() -> Result<Self> {
        Self::from_file_and_env::<&str>(None)
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Layer defaults, an optional config file and `PRINTBAY_*` env vars.
    pub fn from_file_and_env<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", "http://localhost:8883/api")?
            .set_default("timeout", 30)?
            .set_default("verbose", false)?;

        if let Some(config_path) = config_file {
            if config_path.as_ref().exists() {
                builder = builder.add_source(File::from(config_path.as_ref()));
            }
        }
        builder = builder.add_source(Environment::with_prefix("PRINTBAY").try_parsing(true));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(PrintBayError::invalid_input("Base URL cannot be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(PrintBayError::Config {
                code: crate::error::ErrorCode::InvalidEndpoint,
                message: format!("Endpoint must be an http(s) URL: {}", self.base_url),
                source: None,
            });
        }
        Ok(())
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}
