//! Configuration management for the todos client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary loads an optional `.env` file first.

use crate::types::UserId;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default base URL of the remote collection
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Invalid configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `TODOS_API_URL` is set but empty
    #[error("TODOS_API_URL must not be empty")]
    EmptyApiUrl,

    /// `TODOS_API_URL` is not an http(s) URL
    #[error("TODOS_API_URL must start with http:// or https://, got {0}")]
    InvalidApiUrl(String),
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodosConfig {
    /// Base URL of the remote collection
    pub api_url: String,
    /// Owner identifier; `None` shows the warning view
    pub user_id: Option<UserId>,
    /// Error banner lifetime
    pub error_timeout: Duration,
    /// Grace period for in-flight effects on exit
    pub shutdown_timeout: Duration,
}

impl Default for TodosConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: None,
            error_timeout: Duration::from_millis(3000),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl TodosConfig {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_url: lookup("TODOS_API_URL")
                .map_or(defaults.api_url, |s| s.trim().to_string()),
            user_id: lookup("TODOS_USER_ID")
                .and_then(|s| s.trim().parse().ok())
                .and_then(UserId::new),
            error_timeout: lookup("TODOS_ERROR_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.error_timeout, Duration::from_millis),
            shutdown_timeout: lookup("TODOS_SHUTDOWN_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.shutdown_timeout, Duration::from_secs),
        }
    }

    /// Check the configuration before use
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL is empty or not http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.as_str();
        if url.is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(url.to_string()));
        }
        Ok(())
    }
}
