//! HTTP request handlers for the docrelay API
//!
//! Implements the upload-and-process endpoint and the health check.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::core::error::{RelayError, Result};
use crate::core::relay;
use crate::core::services::Services;
use crate::core::staging::Workspace;
use crate::core::types::{HealthResponse, StoredUpload};

/// Multipart field name carrying the uploaded files.
///
/// Files arriving under any other field are ignored.
pub const UPLOAD_FIELD: &str = "myFiles";

/// Health check handler
///
/// Returns server status and version information.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Upload-and-process handler
///
/// Stages the uploaded files into a fresh workspace, runs the
/// external processor over them, and relays the processor's JSON
/// result as the response body.
///
/// # Errors
///
/// - 400 "Please choose files" when the request carries no files
/// - 400 when more than the configured maximum are attached or the
///   multipart body cannot be decoded
/// - 500 for staging failures, a failing processor, or a missing or
///   unparsable result artifact
pub async fn upload_multiple_handler(
    State(services): State<Arc<Services>>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let request_id = Uuid::new_v4().to_string();
    let workspace = services.staging.create_workspace(&request_id).await?;

    let outcome = process_upload(&services, &workspace, multipart, &request_id).await;

    if services.config.staging.keep_workspaces {
        tracing::debug!(
            request_id = %request_id,
            dir = %workspace.dir().display(),
            "Keeping workspace"
        );
    } else if let Err(e) = workspace.remove().await {
        tracing::warn!(
            request_id = %request_id,
            error = %e,
            "Failed to remove workspace"
        );
    }

    outcome.map(Json)
}

/// Run the full upload pipeline inside an allocated workspace
///
/// Separated from the handler so workspace cleanup runs on every
/// exit path.
async fn process_upload(
    services: &Services,
    workspace: &Workspace,
    mut multipart: Multipart,
    request_id: &str,
) -> Result<Value> {
    // Wipe before accepting any files; processing must see exactly
    // this request's uploads.
    let removed = workspace.clear_docs().await?;
    if removed > 0 {
        tracing::debug!(request_id = %request_id, removed, "Cleared leftover uploads");
    }

    let uploads = receive_files(services, workspace, &mut multipart).await?;
    if uploads.is_empty() {
        return Err(RelayError::NoFilesAttached);
    }

    tracing::info!(
        request_id = %request_id,
        files = uploads.len(),
        bytes = uploads.iter().map(|u| u.size_bytes).sum::<usize>(),
        "Files staged, invoking processor"
    );

    services.processor.run(workspace.dir()).await?;

    let result_path = workspace.result_path(&services.config.processor.result_file);
    let result = relay::load_result(&result_path).await?;

    tracing::info!(request_id = %request_id, "Result relayed");
    Ok(result)
}

/// Decode the multipart body and persist each file
async fn receive_files(
    services: &Services,
    workspace: &Workspace,
    multipart: &mut Multipart,
) -> Result<Vec<StoredUpload>> {
    let max_files = services.config.limits.max_files;
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::UploadDecode(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let client_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| RelayError::UploadDecode(e.to_string()))?;

        if uploads.len() == max_files {
            return Err(RelayError::TooManyFiles(max_files));
        }

        let stored = workspace.store_upload(UPLOAD_FIELD, &data).await?;
        tracing::debug!(
            file_name = %stored.file_name,
            client_name = %client_name.as_deref().unwrap_or("<unnamed>"),
            size_bytes = stored.size_bytes,
            "Upload staged"
        );
        uploads.push(stored);
    }

    Ok(uploads)
}
