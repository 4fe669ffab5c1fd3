use std::time::Duration;

use thiserror::Error;

use crate::constants::SAVE_PAGE_ENDPOINT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as number: {source}")]
    ParseFloat {
        name: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Credentials
    pub tokens: Vec<String>,

    // Target sources
    pub directory_api_host: String,
    pub additional_hosts: Vec<String>,

    // Rate limiting
    pub max_requests_per_window: usize,
    pub window: Duration,

    // Retry policy
    pub max_retries_per_url: u32,
    pub base_retry_delay_secs: f64,

    // Save Page Now endpoint
    pub save_endpoint: String,
    pub submit_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Credentials
            tokens: parse_token_list(&required_env("INTERNET_ARCHIVE_TOKENS")?),

            // Target sources
            directory_api_host: required_env("DIRECTORY_API_HOST")?,
            additional_hosts: parse_host_list(&env_or_default("ADDITIONAL_HOSTS", "")),

            // Rate limiting
            max_requests_per_window: parse_env_usize("MAX_REQUESTS_PER_WINDOW", 12)?,
            window: Duration::from_secs_f64(parse_env_secs("WINDOW_SECONDS", 60.0)?),

            // Retry policy
            max_retries_per_url: parse_env_u32("MAX_RETRIES_PER_URL", 3)?,
            base_retry_delay_secs: parse_env_secs("BASE_RETRY_DELAY_SECS", 10.0)?,

            // Save Page Now endpoint
            save_endpoint: env_or_default("SAVE_API_ENDPOINT", SAVE_PAGE_ENDPOINT),
            submit_timeout: Duration::from_secs(parse_env_u64("SUBMIT_TIMEOUT_SECS", 30)?),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokens.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "INTERNET_ARCHIVE_TOKENS".to_string(),
                message: "must contain at least one token in key:value form".to_string(),
            });
        }
        if self.max_requests_per_window == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_REQUESTS_PER_WINDOW".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_retries_per_url == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_RETRIES_PER_URL".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.window.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "WINDOW_SECONDS".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.directory_api_host.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "DIRECTORY_API_HOST".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// A configuration suitable for tests: one dummy token, fast retries, and
    /// a window wide enough to never block.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            tokens: vec!["test-access:test-secret".to_string()],
            directory_api_host: "http://127.0.0.1:0".to_string(),
            additional_hosts: Vec::new(),
            max_requests_per_window: 1000,
            window: Duration::from_secs(60),
            max_retries_per_url: 3,
            base_retry_delay_secs: 0.0,
            save_endpoint: SAVE_PAGE_ENDPOINT.to_string(),
            submit_timeout: Duration::from_secs(10),
        }
    }
}

/// Split a comma-separated token list, keeping only well-formed entries
/// (non-empty, containing the `:` key/secret separator).
fn parse_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.contains(':'))
        .map(String::from)
        .collect()
}

/// Split a comma-separated host list, dropping empty entries.
fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(String::from)
        .collect()
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

/// Parse a non-negative seconds value; negative durations are rejected rather
/// than panicking later in `Duration::from_secs_f64`.
fn parse_env_secs(name: &str, default: f64) -> Result<f64, ConfigError> {
    let value: f64 = match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseFloat {
            name: name.to_string(),
            source: e,
        })?,
        _ => default,
    };
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("must be a non-negative number of seconds, got {value}"),
        });
    }
    Ok(value)
}
