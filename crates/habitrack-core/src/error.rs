//! Core error types for habitrack-core.
//!
//! Widgets never fail; only store operations, the backend binding and the
//! configuration layer produce errors. The hierarchy below keeps form-level
//! problems ([`ValidationError`]) apart from backend failures
//! ([`TransportError`]) so the presentation shell can route them differently.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Form-level problems, reported before any request is issued
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backend or network failures
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Transport(_))
    }
}

/// Validation errors raised by the create/edit form path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No category was picked in the form
    #[error("a category must be selected")]
    MissingCategory,

    /// The picked slug is not in the registry
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// Habit name is empty after trimming
    #[error("habit name must not be empty")]
    MissingName,

    /// A numeric form field did not parse
    #[error("invalid number for '{field}': '{value}'")]
    MalformedNumber { field: String, value: String },

    /// Progress of one kind was recorded against a habit of another kind
    #[error("habit {id} is {kind}, cannot record {progress} progress")]
    ProgressKindMismatch {
        id: i64,
        kind: String,
        progress: String,
    },
}

/// Failures talking to the habit-persistence service.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request never produced a response
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the wire model
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The configured base URL could not be joined with an endpoint path
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failure reported by a non-HTTP backend (e.g. the in-memory service)
    #[error("{0}")]
    Backend(String),
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

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be determined or created
    #[error("config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_converts_into_core_error() {
        let err: CoreError = ValidationError::MissingCategory.into();
        assert!(err.is_validation());
        assert!(!err.is_transport());
        assert_eq!(
            err.to_string(),
            "Validation error: a category must be selected"
        );
    }

    #[test]
    fn status_error_message_includes_body() {
        let err = TransportError::Status {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "backend returned 500: boom");
    }
}
