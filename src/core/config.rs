//! Configuration management for the docrelay service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub staging: StagingConfig,
    #[serde(default)]
    pub processor: ProcessorConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Staging area configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StagingConfig {
    /// Root directory for per-request workspaces
    #[serde(default = "default_staging_root")]
    pub root: PathBuf,

    /// Keep workspaces on disk after the response (debugging aid)
    #[serde(default)]
    pub keep_workspaces: bool,
}

/// External processor configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessorConfig {
    /// Interpreter or executable that runs the script
    #[serde(default = "default_program")]
    pub program: String,

    /// Script path, resolved against the service working directory
    /// at startup
    #[serde(default = "default_script")]
    pub script: PathBuf,

    /// Extra arguments appended after the script path
    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,

    /// File name the script writes into its working directory
    #[serde(default = "default_result_file")]
    pub result_file: String,

    /// Maximum seconds to wait for the script; unset waits
    /// indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Request limits configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum files accepted per upload request
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_mb")]
    pub max_body_mb: usize,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_staging_root() -> PathBuf {
    PathBuf::from("./staging")
}

fn default_program() -> String {
    "python3".to_string()
}

fn default_script() -> PathBuf {
    PathBuf::from("./main.py")
}

fn default_extra_args() -> Vec<String> {
    vec!["--foo".to_string(), "some value for foo".to_string()]
}

fn default_result_file() -> String {
    "person.json".to_string()
}

fn default_max_files() -> usize {
    12
}

fn default_max_body_mb() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            root: default_staging_root(),
            keep_workspaces: false,
        }
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            script: default_script(),
            extra_args: default_extra_args(),
            result_file: default_result_file(),
            timeout_secs: None,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_body_mb: default_max_body_mb(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| RelayError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// File resolution order:
    /// 1. DOCRELAY_CONFIG env var
    /// 2. ./docrelay.toml
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCRELAY_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("docrelay.toml").exists() {
            Self::from_file("docrelay.toml")?
        } else {
            Self::default()
        };

        // Override with environment variables
        config.merge_env();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Server configuration
        if let Ok(host) = env::var("DOCRELAY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("DOCRELAY_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Staging configuration
        if let Ok(root) = env::var("DOCRELAY_STAGING_ROOT") {
            self.staging.root = PathBuf::from(root);
        }
        if let Ok(keep) = env::var("DOCRELAY_KEEP_WORKSPACES") {
            if let Ok(k) = keep.parse() {
                self.staging.keep_workspaces = k;
            }
        }

        // Processor configuration
        if let Ok(program) = env::var("DOCRELAY_PROCESSOR_PROGRAM") {
            self.processor.program = program;
        }
        if let Ok(script) = env::var("DOCRELAY_PROCESSOR_SCRIPT") {
            self.processor.script = PathBuf::from(script);
        }
        if let Ok(timeout) = env::var("DOCRELAY_PROCESSOR_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.processor.timeout_secs = Some(t);
            }
        }

        // Limits configuration
        if let Ok(max_files) = env::var("DOCRELAY_MAX_FILES") {
            if let Ok(m) = max_files.parse() {
                self.limits.max_files = m;
            }
        }
        if let Ok(max_body) = env::var("DOCRELAY_MAX_BODY_MB") {
            if let Ok(m) = max_body.parse() {
                self.limits.max_body_mb = m;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(RelayError::ConfigError(
                "Server host must not be empty".to_string(),
            ));
        }

        if self.processor.program.is_empty() {
            return Err(RelayError::ConfigError(
                "Processor program must not be empty".to_string(),
            ));
        }

        if self.processor.result_file.is_empty() {
            return Err(RelayError::ConfigError(
                "Result file name must not be empty".to_string(),
            ));
        }

        // The result file is resolved inside the workspace; a path
        // separator would escape it.
        if self.processor.result_file.contains('/') || self.processor.result_file.contains('\\') {
            return Err(RelayError::ConfigError(
                "Result file must be a bare file name".to_string(),
            ));
        }

        if let Some(0) = self.processor.timeout_secs {
            return Err(RelayError::ConfigError(
                "Processor timeout must be non-zero".to_string(),
            ));
        }

        if self.limits.max_files == 0 {
            return Err(RelayError::ConfigError(
                "Max files must be non-zero".to_string(),
            ));
        }

        if self.limits.max_body_mb == 0 {
            return Err(RelayError::ConfigError(
                "Max body size must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Bind address: {}:{}", self.server.host, self.server.port);
        tracing::info!("  Staging root: {:?}", self.staging.root);
        tracing::info!("  Keep workspaces: {}", self.staging.keep_workspaces);
        tracing::info!("  Processor: {}", self.processor.program);
        tracing::info!("  Script: {:?}", self.processor.script);
        tracing::info!("  Extra args: {:?}", self.processor.extra_args);
        tracing::info!("  Result file: {}", self.processor.result_file);
        match self.processor.timeout_secs {
            Some(t) => tracing::info!("  Processor timeout: {}s", t),
            None => tracing::info!("  Processor timeout: none"),
        }
        tracing::info!("  Max files: {}", self.limits.max_files);
        tracing::info!("  Max body: {} MB", self.limits.max_body_mb);
    }
}
