//! Error types for ShopCheck

use thiserror::Error;

/// Result type alias using ShopCheck Error
pub type Result<T> = std::result::Result<T, Error>;

/// ShopCheck error types
#[derive(Error, Debug)]
pub enum Error {
    /// A builder setter received a value outside its domain
    #[error("Invalid value for {field}: {reason}")]
    BuildConstraint { field: &'static str, reason: String },

    /// The event factory was handed input it cannot turn into an event
    #[error("Invalid factory input: {0}")]
    FactoryInput(String),

    /// A field path expression could not be parsed
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A field path does not resolve against the event structure
    #[error("Path '{path}' does not resolve at '{segment}': {reason}")]
    PathResolution {
        path: String,
        segment: String,
        reason: String,
    },

    /// A validation directive did not hold
    #[error("Assertion failed [{directive}]: {message}")]
    Assertion { directive: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn constraint(field: &'static str, reason: impl Into<String>) -> Self {
        Error::BuildConstraint {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn assertion(directive: impl ToString, message: impl Into<String>) -> Self {
        Error::Assertion {
            directive: directive.to_string(),
            message: message.into(),
        }
    }

    /// True for failures raised by a validation directive that did not hold
    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::Assertion { .. })
    }

    /// True for failures caused by a field path that does not resolve
    pub fn is_path_resolution(&self) -> bool {
        matches!(self, Error::PathResolution { .. })
    }
}
