//! Permissions back-office endpoints
//!
//! Every route here sits behind [`AdminGuard`](crate::server::middleware::AdminGuard).

use crate::auth::rbac::RuleKind;
use crate::server::middleware::current_subject;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::ArmoryError;
use crate::utils::logging::mask_subject;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Configure permissions routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/permissions")
            .route("", web::get().to(list_permissions))
            .route("/users/{subject}", web::get().to(user_roles))
            .route("/assign", web::post().to(assign_role))
            .route("/revoke", web::post().to(revoke_role))
            .route("/reload", web::post().to(reload_policies)),
    );
}

/// Body of assign and revoke requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignmentRequest {
    pub subject: String,
    pub role: String,
}

impl RoleAssignmentRequest {
    fn normalized(&self) -> (String, String) {
        (self.subject.trim().to_string(), self.role.trim().to_string())
    }
}

/// One role and the subjects holding it directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleHolders {
    pub role: String,
    pub holders: Vec<String>,
}

/// Back-office landing data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsOverview {
    pub roles: Vec<RoleHolders>,
    pub rule_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Roles and effective permissions of one subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRoles {
    pub subject: String,
    pub roles: Vec<String>,
    pub implicit_roles: Vec<String>,
    pub permissions: Vec<RuleKind>,
}

/// Outcome of an assign or revoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub subject: String,
    pub role: String,
    pub has_role: bool,
}

/// List every role with its direct holders
async fn list_permissions(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let enforcer = &state.enforcer;
    let roles = enforcer
        .get_all_roles()
        .into_iter()
        .map(|role| RoleHolders {
            holders: enforcer.get_users_for_role(&role),
            role,
        })
        .collect();

    let overview = PermissionsOverview {
        roles,
        rule_count: enforcer.rule_count(),
        loaded_at: enforcer.loaded_at(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(overview)))
}

/// Direct and inherited roles of one subject
async fn user_roles(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let subject = path.into_inner();
    let enforcer = &state.enforcer;

    let roles = SubjectRoles {
        roles: enforcer.get_roles_for_user(&subject),
        implicit_roles: enforcer.get_implicit_roles_for_user(&subject),
        permissions: enforcer.get_permissions_for_user(&subject),
        subject,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(roles)))
}

/// Assign a role, then reload policies
async fn assign_role(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<RoleAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let operator = current_subject(&req)?;
    let (subject, role) = request.normalized();

    match state.enforcer.add_role_for_user(&subject, &role).await {
        Ok(()) => {
            info!(
                "{} assigned role {} to {}",
                mask_subject(&operator.0),
                role,
                mask_subject(&subject)
            );
            let message = format!("Role {} assigned to {}", role, subject);
            let outcome = AssignmentOutcome {
                has_role: state.enforcer.has_role(&subject, &role),
                subject,
                role,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(outcome, message)))
        }
        Err(ArmoryError::DuplicateRule(_)) => {
            warn!("Role {} already assigned to {}", role, mask_subject(&subject));
            Ok(HttpResponse::Conflict().json(ApiResponse::error(format!(
                "Role {} already assigned to {}",
                role, subject
            ))))
        }
        Err(e) => {
            error!("Failed to assign role {}: {}", role, e);
            Ok(ApiResponse::from_error(&e))
        }
    }
}

/// Revoke a role, then reload policies
async fn revoke_role(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<RoleAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let operator = current_subject(&req)?;
    let (subject, role) = request.normalized();

    match state.enforcer.remove_role_for_user(&subject, &role).await {
        Ok(removed) => {
            let message = if removed {
                info!(
                    "{} revoked role {} from {}",
                    mask_subject(&operator.0),
                    role,
                    mask_subject(&subject)
                );
                format!("Role {} revoked from {}", role, subject)
            } else {
                format!("{} did not hold role {}", subject, role)
            };
            let outcome = AssignmentOutcome {
                has_role: state.enforcer.has_role(&subject, &role),
                subject,
                role,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(outcome, message)))
        }
        Err(e) => {
            error!("Failed to revoke role {}: {}", role, e);
            Ok(ApiResponse::from_error(&e))
        }
    }
}

/// Rebuild the policy snapshot from storage
async fn reload_policies(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match state.enforcer.load_policy().await {
        Ok(()) => {
            let count = state.enforcer.rule_count();
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
                count,
                format!("Reloaded {} rules", count),
            )))
        }
        Err(e) => {
            error!("Policy reload failed: {}", e);
            Ok(ApiResponse::from_error(&e))
        }
    }
}
