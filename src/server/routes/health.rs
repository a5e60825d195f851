//! Health check endpoint

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::StorageHealthStatus;
use actix_web::{HttpResponse, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Service health, including whether policies are loaded
///
/// Answers 503 while the policy snapshot is missing or the database is
/// unreachable, so load balancers hold traffic back.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let storage = state.storage.health_check().await;
    let policies = PolicyStatus {
        loaded: state.enforcer.is_loaded(),
        rule_count: state.enforcer.rule_count(),
        loaded_at: state.enforcer.loaded_at(),
    };
    let healthy = storage.overall && policies.loaded;

    let status = HealthStatus {
        status: if healthy {
            Cow::Borrowed("healthy")
        } else {
            Cow::Borrowed("degraded")
        },
        timestamp: Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        storage,
        policies,
    };

    let response = ApiResponse::success(status);
    if healthy {
        Ok(HttpResponse::Ok().json(response))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(response))
    }
}

/// Health status response
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: DateTime<Utc>,
    version: Cow<'static, str>,
    storage: StorageHealthStatus,
    policies: PolicyStatus,
}

#[derive(Debug, Clone, serde::Serialize)]
struct PolicyStatus {
    loaded: bool,
    rule_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    loaded_at: Option<DateTime<Utc>>,
}
