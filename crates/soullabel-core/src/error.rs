//! Core error types for soullabel-core.
//!
//! Session commands never fail: a command whose preconditions are not met is
//! rejected by returning `None`. The types here cover everything around the
//! session instead: loading quiz data, reading configuration, and the one
//! user-visible failure, the unimplemented share action.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for soullabel-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Action exists on screen but has no implementation behind it
    #[error("{action} is not implemented yet")]
    NotImplemented { action: &'static str },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Duplicate identifier inside a collection
    #[error("Duplicate id '{id}' in {collection}")]
    DuplicateId { collection: String, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_implemented_message_is_user_facing() {
        let err = CoreError::NotImplemented { action: "share" };
        assert_eq!(err.to_string(), "share is not implemented yet");
    }

    #[test]
    fn validation_error_wraps_into_core_error() {
        let err: CoreError = ValidationError::EmptyCollection("tags".into()).into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: Empty collection: tags");
    }
}
