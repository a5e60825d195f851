//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::auth::rbac::{Enforcer, import_default_policies};
use crate::config::{Config, ServerConfig};
use crate::server::middleware::AdminGuard;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::StorageLayer;
use crate::utils::error::{ArmoryError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Connect storage, run migrations and seed default policies
    ///
    /// Fails when seeding fails, so the service never serves an unseeded store.
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let storage = StorageLayer::new(config.storage()).await?;
        storage.migrate().await?;

        let enforcer = Arc::new(Enforcer::with_database(
            storage.database.clone(),
            config.rbac(),
        ));

        if config.rbac().admin_subjects.is_empty() {
            warn!("No admin subjects configured; the back-office is reachable only by existing admins");
        }
        let report = import_default_policies(&enforcer, config.rbac()).await?;
        info!(
            "Policies ready: {} rules loaded ({} seeded)",
            enforcer.rule_count(),
            report.inserted
        );

        Ok(Self::from_state(AppState::new(config.clone(), storage, enforcer)))
    }

    /// Wrap prepared state
    pub fn from_state(state: AppState) -> Self {
        Self {
            config: state.config.server.clone(),
            state,
        }
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let workers = self.config.worker_count();
        let timeout = Duration::from_secs(self.config.timeout);

        info!("Starting HTTP server on {} with {} workers", bind_addr, workers);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || create_app(state.clone()))
            .workers(workers)
            .client_request_timeout(timeout)
            .bind(&bind_addr)
            .map_err(|e| ArmoryError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server.await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Create the Actix-web application
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(state.config.server.max_body_size)
        .error_handler(|err, _req| ArmoryError::validation(err.to_string()).into());

    App::new()
        .app_data(state)
        .app_data(json_config)
        .wrap(AdminGuard)
        .wrap(TracingLogger::default())
        .wrap(DefaultHeaders::new().add(("Server", "Armory-Authz")))
        .configure(routes::health::configure_routes)
        .configure(routes::permissions::configure_routes)
}
