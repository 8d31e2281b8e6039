//! Result artifact loading.
//!
//! After the processor exits successfully, the workspace is expected
//! to contain a JSON result file. A missing or unparsable artifact is
//! a recoverable error, surfaced to the caller as a structured
//! response.

use std::io;
use std::path::Path;

use serde_json::Value;
use tokio::fs;

use crate::core::error::{RelayError, Result};

/// Read and parse the result artifact produced by the processor
pub async fn load_result(path: &Path) -> Result<Value> {
    let raw = fs::read(path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            RelayError::ResultMissing(path.display().to_string())
        } else {
            RelayError::IoError(e)
        }
    })?;

    let value: Value = serde_json::from_slice(&raw)?;
    Ok(value)
}
