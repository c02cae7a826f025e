//! Error taxonomy for coaching requests.
//!
//! Formatting and prompt assembly never fail; only the boundary (validation),
//! configuration, the LLM call and response extraction produce errors.

use thiserror::Error;

/// Closed set of failures a coaching request can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoachError {
    /// A required setting (credential, prompt file) is missing.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The LLM service could not be reached or answered with a non-2xx status.
    #[error("upstream error{}: {message}", status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Upstream { status: Option<u16>, message: String },

    /// Model output was not valid JSON after fence stripping.
    #[error("could not parse model response as JSON: {message} at line {line} column {column}. Raw (first 300 chars): {excerpt}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
        excerpt: String,
    },

    /// Caller-supplied game state failed schema constraints.
    #[error("invalid game state: {field}: {message}")]
    Validation { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, CoachError>;

impl CoachError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable label for logs and JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Parse { .. } => "parse_error",
            Self::Validation { .. } => "validation_error",
        }
    }

    /// HTTP-style status code, one per variant.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration { .. } => 500,
            Self::Upstream { .. } => 502,
            Self::Parse { .. } => 422,
            Self::Validation { .. } => 400,
        }
    }
}
