//! Error types and error handling for the docrelay service.
//!
//! This module defines the error types used throughout the
//! application and provides conversion to HTTP status codes for
//! API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for docrelay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Main error type for the docrelay service
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Please choose files")]
    NoFilesAttached,

    #[error("Too many files attached, limit is {0}")]
    TooManyFiles(usize),

    #[error("Invalid upload name: {0}")]
    InvalidUploadName(String),

    #[error("Upload decode failed: {0}")]
    UploadDecode(String),

    #[error("Staging error: {0}")]
    StagingError(String),

    #[error("Processor failed: {0}")]
    ProcessorFailed(String),

    #[error("Processor timed out after {0}s")]
    ProcessorTimeout(u64),

    #[error("Result artifact not found: {0}")]
    ResultMissing(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Result parse error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl RelayError {
    /// Convert error to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::NoFilesAttached
            | RelayError::TooManyFiles(_)
            | RelayError::InvalidUploadName(_)
            | RelayError::UploadDecode(_) => StatusCode::BAD_REQUEST,
            RelayError::StagingError(_)
            | RelayError::ProcessorFailed(_)
            | RelayError::ProcessorTimeout(_)
            | RelayError::ResultMissing(_)
            | RelayError::ConfigError(_)
            | RelayError::IoError(_)
            | RelayError::SerdeError(_)
            | RelayError::TomlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
