//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of the HTTP transport.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **staging**: Workspace allocation and upload persistence
//! - **processor**: External script invocation
//! - **relay**: Result artifact loading
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod processor;
pub mod relay;
pub mod services;
pub mod staging;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{RelayError, Result};
pub use services::Services;
