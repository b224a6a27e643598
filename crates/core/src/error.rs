//! Error kinds produced while handling a job run.
//!
//! Every variant except [`AdapterError::Configuration`] is reported back to the
//! caller inside an error envelope; configuration errors only occur at startup.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// A required input field is missing or malformed. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    /// The upstream call succeeded but the user node or repository does not exist.
    #[error("Repository ({address}) not found.")]
    NotFound { address: String },

    /// Network failure, non-success upstream status, or retries exhausted.
    #[error("{0}")]
    Transport(String),

    /// Missing or invalid process configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AdapterError {
    pub fn missing_param(name: &str) -> Self {
        Self::Validation(format!("Required parameter not supplied: {name}"))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::Transport(_) | Self::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
