//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{ArmoryError, Result};
use tracing::info;

/// Server builder for easier configuration
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| ArmoryError::config("Configuration is required"))?;

        HttpServer::new(&config).await
    }
}

/// Build the server from `config` and serve until shutdown
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting Virtual Armory authorization service");

    let server = ServerBuilder::new().with_config(config).build().await?;

    info!("Server starting at: http://{}", server.config().address());
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /admin/permissions - Roles and holders");
    info!("   GET  /admin/permissions/users/{{subject}} - Roles of one subject");
    info!("   POST /admin/permissions/assign - Assign a role");
    info!("   POST /admin/permissions/revoke - Revoke a role");
    info!("   POST /admin/permissions/reload - Reload policies");

    server.start().await
}
