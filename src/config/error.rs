//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind host '{0}'")]
    InvalidHost(String),

    #[error("Dispatch timeouts must be greater than zero")]
    InvalidTimeout,

    #[error("Default dispatch timeout ({default_ms} ms) exceeds maximum ({max_ms} ms)")]
    DefaultTimeoutExceedsMax { default_ms: u64, max_ms: u64 },
}
