// feastly/src/config.rs

use crate::error::{Result, StoreError};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STORAGE_PATH: &str = ".feastly/storage.json";

#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Root of the REST API, without a trailing slash.
  pub api_base_url: String,
  pub request_timeout: Duration,
  /// JSON file backing persisted client storage (token, last order summary).
  pub storage_path: PathBuf,
}

impl ClientConfig {
  pub fn new(api_base_url: impl Into<String>) -> Self {
    Self {
      api_base_url: normalize_base_url(&api_base_url.into()),
      request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
    }
  }

  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| StoreError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let api_base_url = get_env("FEASTLY_API_BASE_URL")?;
    url::Url::parse(&api_base_url)
      .map_err(|e| StoreError::Config(format!("Invalid FEASTLY_API_BASE_URL '{}': {}", api_base_url, e)))?;

    let timeout_secs = get_env("FEASTLY_REQUEST_TIMEOUT_SECS")
      .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
      .parse::<u64>()
      .map_err(|e| StoreError::Config(format!("Invalid FEASTLY_REQUEST_TIMEOUT_SECS: {}", e)))?;
    if timeout_secs == 0 {
      return Err(StoreError::Config(
        "FEASTLY_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
      ));
    }

    let storage_path = get_env("FEASTLY_STORAGE_PATH").unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string());

    tracing::info!(api_base_url = %api_base_url, timeout_secs, "Client configuration loaded.");

    Ok(Self {
      api_base_url: normalize_base_url(&api_base_url),
      request_timeout: Duration::from_secs(timeout_secs),
      storage_path: PathBuf::from(storage_path),
    })
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout = timeout;
    self
  }

  pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.storage_path = path.into();
    self
  }
}

fn normalize_base_url(raw: &str) -> String {
  raw.trim().trim_end_matches('/').to_string()
}
