//! Core data types for the docrelay service.

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status, "ok" when healthy
    pub status: String,

    /// Crate version
    pub version: String,
}

/// A single upload persisted into a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUpload {
    /// Multipart field the file arrived under
    pub field_name: String,

    /// Assigned on-disk name (`<field>-<millis>`)
    pub file_name: String,

    /// File size in bytes
    pub size_bytes: usize,
}
