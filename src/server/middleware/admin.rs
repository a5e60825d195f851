//! Back-office authorization middleware

use crate::server::middleware::helpers::{extract_subject, is_admin_route};
use crate::server::state::AppState;
use crate::utils::error::{ArmoryError, Result as ArmoryResult};
use crate::utils::logging::mask_subject;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Authenticated caller, attached to back-office requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(pub String);

/// Guard for `/admin` routes
///
/// Requests without the subject header get 401; subjects lacking the
/// configured administrator role get 403. Other routes pass through.
pub struct AdminGuard;

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AdminGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGuardService { service }))
    }
}

/// Service implementation for the admin guard
pub struct AdminGuardService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !is_admin_route(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        match authorize(&req) {
            Ok(subject) => {
                debug!("Back-office access granted to {}", mask_subject(&subject.0));
                req.extensions_mut().insert(subject);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(e) => {
                let res = req.error_response(e).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

fn authorize(req: &ServiceRequest) -> ArmoryResult<Subject> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ArmoryError::internal("application state not configured"))?;

    let subject = extract_subject(req.headers(), &state.config.server.subject_header)
        .ok_or_else(|| ArmoryError::unauthorized("Authentication required"))?;

    let admin_role = &state.config.rbac.admin_role;
    if !state.enforcer.has_role(&subject, admin_role) {
        warn!(
            "Denied {} {} to {}",
            req.method(),
            req.path(),
            mask_subject(&subject)
        );
        return Err(ArmoryError::forbidden(format!(
            "The {} role is required",
            admin_role
        )));
    }

    Ok(Subject(subject))
}

/// Subject attached by [`AdminGuard`]
pub fn current_subject(req: &HttpRequest) -> ArmoryResult<Subject> {
    req.extensions()
        .get::<Subject>()
        .cloned()
        .ok_or_else(|| ArmoryError::unauthorized("Authentication required"))
}
