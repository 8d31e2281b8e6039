//! Unified service container for docrelay
//!
//! Provides shared access to all core services.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::processor::Processor;
use crate::core::staging::StagingArea;
use std::sync::Arc;

/// Unified services container
///
/// Handlers share one instance of this struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Staging area managing per-request workspaces
    pub staging: Arc<StagingArea>,

    /// External processor invoker
    pub processor: Arc<Processor>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Result<Self> {
        let staging = Arc::new(StagingArea::new(config.staging.root.clone()));
        let processor = Arc::new(Processor::from_config(&config.processor)?);

        Ok(Self {
            staging,
            processor,
            config: Arc::new(config),
        })
    }
}
