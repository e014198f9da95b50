//! # Error Types
//!
//! Structured error types for marine_core. The sizing pipeline itself is
//! total and never returns an error; these variants cover the fallible edges
//! around it: parsing enum values from user text, setting form fields, and
//! loading or validating an [`EnginePolicy`](crate::policy::EnginePolicy).
//!
//! ## Example
//!
//! ```rust
//! use marine_core::errors::{CalcError, CalcResult};
//!
//! fn validate_duty_cycle(duty: f64) -> CalcResult<()> {
//!     if !(0.0..=1.0).contains(&duty) {
//!         return Err(CalcError::InvalidInput {
//!             field: "duty_cycle".to_string(),
//!             value: duty.to_string(),
//!             reason: "Duty cycle must be between 0 and 1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_duty_cycle(1.5).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for marine_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for the fallible edges of the engine.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A string did not name any variant of an enumeration
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: String, value: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownVariant error
    pub fn unknown_variant(kind: impl Into<String>, value: impl Into<String>) -> Self {
        CalcError::UnknownVariant {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownVariant { .. } => "UNKNOWN_VARIANT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(err: toml::de::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}
