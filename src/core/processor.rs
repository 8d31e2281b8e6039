//! External processor invocation.
//!
//! Launches the configured script once per request with a fixed
//! argument list, the request workspace as its working directory,
//! and unbuffered output (`-u`). The exit status is inspected: a
//! non-zero exit aborts the request instead of relaying whatever
//! happens to be on disk.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::core::config::ProcessorConfig;
use crate::core::error::{RelayError, Result};

/// Invokes the external processing script
#[derive(Debug, Clone)]
pub struct Processor {
    program: String,
    script: PathBuf,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
}

impl Processor {
    /// Build a processor from configuration
    ///
    /// A relative script path is resolved against the service's
    /// working directory at startup, since the subprocess itself
    /// runs inside a request workspace.
    pub fn from_config(config: &ProcessorConfig) -> Result<Self> {
        let script = if config.script.is_absolute() {
            config.script.clone()
        } else {
            std::env::current_dir()?.join(&config.script)
        };

        Ok(Self {
            program: config.program.clone(),
            script,
            extra_args: config.extra_args.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Absolute script path the processor will run
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Run the script to completion inside the given workspace
    ///
    /// The invocation is `<program> -u <script> <extra_args...>`.
    /// stdout/stderr are captured and logged. Returns an error when
    /// the process cannot be launched, exits non-zero, or exceeds
    /// the configured timeout (the child is killed in that case).
    pub async fn run(&self, workdir: &Path) -> Result<()> {
        tracing::debug!(
            program = %self.program,
            script = %self.script.display(),
            workdir = %workdir.display(),
            "Launching processor"
        );

        let mut command = Command::new(&self.program);
        command
            .arg("-u")
            .arg(&self.script)
            .args(&self.extra_args)
            .current_dir(workdir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| RelayError::ProcessorTimeout(limit.as_secs()))?,
            None => command.output().await,
        }
        .map_err(|e| {
            RelayError::ProcessorFailed(format!("Failed to launch '{}': {e}", self.program))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(stdout = %stdout.trim(), "Processor output");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = %output.status,
                stderr = %stderr.trim(),
                "Processor exited unsuccessfully"
            );
            return Err(RelayError::ProcessorFailed(match output.status.code() {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            }));
        }

        tracing::debug!("Processor completed");
        Ok(())
    }
}
