//! Workspace allocation and upload persistence.
//!
//! The staging area owns a root directory under which every upload
//! request gets its own workspace. A workspace holds the request's
//! upload directory (`docs/`) and receives the processor's result
//! artifact. Isolating requests this way means concurrent uploads
//! never observe each other's files or results.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use crate::core::error::{RelayError, Result};
use crate::core::types::StoredUpload;

/// Directory inside each workspace where uploads are staged.
///
/// The name is part of the processor contract: the script resolves
/// `docs/` relative to its working directory.
pub const DOCS_DIR: &str = "docs";

/// Manages per-request workspaces under a fixed root directory
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create a staging area rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory containing all workspaces
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist
    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Allocate a workspace for one request
    ///
    /// Creates `<root>/<request_id>/docs/`. Reusing an id is
    /// harmless; the wipe step clears any leftover uploads.
    pub async fn create_workspace(&self, request_id: &str) -> Result<Workspace> {
        let dir = self.root.join(request_id);
        fs::create_dir_all(dir.join(DOCS_DIR)).await?;
        Ok(Workspace { dir })
    }
}

/// An isolated working directory for a single upload request
///
/// The processor runs with this directory as its working directory,
/// so the script's relative paths (`docs/`, its result file) resolve
/// inside the workspace.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    /// Workspace directory (the processor's working directory)
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Upload directory inside the workspace
    pub fn docs_dir(&self) -> PathBuf {
        self.dir.join(DOCS_DIR)
    }

    /// Path of the result artifact the processor is expected to write
    pub fn result_path(&self, result_file: &str) -> PathBuf {
        self.dir.join(result_file)
    }

    /// Delete every entry in the upload directory
    ///
    /// Runs before any files are accepted so that processing sees
    /// exactly the current request's files. Wiping an empty directory
    /// is a no-op. Any enumeration or deletion failure is fatal to
    /// the request; processing must not continue with a partially
    /// cleared directory.
    ///
    /// Returns the number of entries removed.
    pub async fn clear_docs(&self) -> Result<usize> {
        let docs = self.docs_dir();
        let mut entries = fs::read_dir(&docs).await.map_err(|e| {
            RelayError::StagingError(format!("Failed to list {}: {e}", docs.display()))
        })?;

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                fs::remove_dir_all(&path).await?;
            } else {
                fs::remove_file(&path).await?;
            }
            removed += 1;
        }

        Ok(removed)
    }

    /// Persist one uploaded file into the upload directory
    ///
    /// The on-disk name is the field name plus a millisecond
    /// timestamp captured at write time. Two writes in the same
    /// millisecond get a numeric suffix so no upload is silently
    /// overwritten.
    pub async fn store_upload(&self, field_name: &str, data: &[u8]) -> Result<StoredUpload> {
        if field_name.is_empty()
            || field_name.contains('/')
            || field_name.contains('\\')
            || field_name.contains("..")
        {
            return Err(RelayError::InvalidUploadName(field_name.to_string()));
        }

        let docs = self.docs_dir();
        let base = format!("{}-{}", field_name, Utc::now().timestamp_millis());

        let mut file_name = base.clone();
        let mut seq = 0;
        let path = loop {
            let candidate = docs.join(&file_name);
            if !fs::try_exists(&candidate).await? {
                break candidate;
            }
            seq += 1;
            file_name = format!("{base}-{seq}");
        };

        fs::write(&path, data).await?;

        Ok(StoredUpload {
            field_name: field_name.to_string(),
            file_name,
            size_bytes: data.len(),
        })
    }

    /// Remove the workspace and everything in it
    pub async fn remove(&self) -> Result<()> {
        fs::remove_dir_all(&self.dir).await?;
        Ok(())
    }
}
