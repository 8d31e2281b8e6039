//! Docrelay - Upload-and-Process Relay Service
//!
//! A small HTTP service that accepts multipart file uploads, stages
//! them in an isolated per-request workspace, runs an external
//! processing script over the staged files, and relays the script's
//! JSON result back to the caller.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types
//!   - staging (workspace allocation, directory wipe, upload persistence)
//!   - processor (external script invocation)
//!   - relay (result artifact loading)
//!   - services (unified service container)
//!
//! - **http**: REST adapter (depends on core)
//!   - handlers, middleware, router
//!
//! # Key Features
//!
//! - Per-request workspace isolation (concurrent uploads never
//!   observe each other's files or results)
//! - Exit-status inspection (a failing processor produces a
//!   structured error, never a stale result)
//! - Structured JSON error envelope on every failure path

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{RelayError, Result};
pub use crate::core::services::Services;
pub use crate::core::staging::{StagingArea, Workspace};
