//! Application state shared across HTTP handlers

use crate::auth::rbac::Enforcer;
use crate::config::Config;
use crate::storage::StorageLayer;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for sharing across worker threads.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Storage layer
    pub storage: Arc<StorageLayer>,
    /// Policy enforcement engine
    pub enforcer: Arc<Enforcer>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, storage: StorageLayer, enforcer: Arc<Enforcer>) -> Self {
        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            enforcer,
        }
    }

    /// Get service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
