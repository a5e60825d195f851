//! Permissions back-office HTTP tests
//!
//! Drive the real application factory with `actix_web::test`.

#[cfg(test)]
mod tests {
    use crate::common::{SubjectFactory, TestDatabase};
    use armory_authz::config::Config;
    use armory_authz::server::routes::ApiResponse;
    use armory_authz::server::routes::permissions::{
        AssignmentOutcome, PermissionsOverview, SubjectRoles,
    };
    use armory_authz::server::{AppState, create_app};
    use armory_authz::storage::StorageLayer;
    use armory_authz::{Enforcer, import_default_policies};
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use serde_json::json;
    use std::sync::Arc;

    const HEADER: &str = "X-Authenticated-User";

    async fn admin_state() -> AppState {
        let db = TestDatabase::new().await;
        let mut config = Config::default();
        config.rbac.admin_subjects = vec![SubjectFactory::admin()];

        let enforcer = Arc::new(Enforcer::with_database(db.db_arc(), config.rbac()));
        import_default_policies(&enforcer, config.rbac())
            .await
            .expect("seeding failed");

        AppState::new(config, StorageLayer::from_database(db.db_arc()), enforcer)
    }

    fn as_admin(req: test::TestRequest) -> test::TestRequest {
        req.insert_header((HEADER, SubjectFactory::admin()))
    }

    #[actix_web::test]
    async fn test_health_is_public() {
        let app = test::init_service(create_app(web::Data::new(admin_state().await))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_missing_subject_is_unauthorized() {
        let app = test::init_service(create_app(web::Data::new(admin_state().await))).await;

        for uri in ["/admin/permissions", "/admin/permissions/users/bob@example.com"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_owner_is_forbidden() {
        let state = admin_state().await;
        let owner = SubjectFactory::unique();
        state.enforcer.add_role_for_user(&owner, "owner").await.unwrap();
        let app = test::init_service(create_app(web::Data::new(state))).await;

        let req = test::TestRequest::post()
            .uri("/admin/permissions/assign")
            .insert_header((HEADER, owner.as_str()))
            .set_json(json!({"subject": owner, "role": "admin"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[actix_web::test]
    async fn test_overview_lists_roles_and_holders() {
        let app = test::init_service(create_app(web::Data::new(admin_state().await))).await;

        let req = as_admin(test::TestRequest::get().uri("/admin/permissions")).to_request();
        let body: ApiResponse<PermissionsOverview> = test::call_and_read_body_json(&app, req).await;

        let overview = body.data.expect("overview data");
        let roles: Vec<&str> = overview.roles.iter().map(|r| r.role.as_str()).collect();
        assert_eq!(roles, vec!["admin", "owner"]);
        assert_eq!(overview.roles[0].holders, vec![SubjectFactory::admin()]);
        assert!(overview.loaded_at.is_some());
    }

    #[actix_web::test]
    async fn test_assign_then_reread() {
        let state = admin_state().await;
        let app = test::init_service(create_app(web::Data::new(state.clone()))).await;
        let subject = SubjectFactory::unique();

        let req = as_admin(test::TestRequest::post().uri("/admin/permissions/assign"))
            .set_json(json!({"subject": subject, "role": "owner"}))
            .to_request();
        let body: ApiResponse<AssignmentOutcome> = test::call_and_read_body_json(&app, req).await;
        assert!(body.success);
        assert!(body.message.unwrap().contains("assigned"));

        // Redirect-and-reread sees the new assignment
        let req = as_admin(
            test::TestRequest::get().uri(&format!("/admin/permissions/users/{}", subject)),
        )
        .to_request();
        let body: ApiResponse<SubjectRoles> = test::call_and_read_body_json(&app, req).await;
        let roles = body.data.unwrap();
        assert_eq!(roles.roles, vec!["owner"]);
        assert!(!roles.permissions.is_empty());
    }

    #[actix_web::test]
    async fn test_assign_duplicate_is_conflict() {
        let state = admin_state().await;
        let subject = SubjectFactory::unique();
        state.enforcer.add_role_for_user(&subject, "owner").await.unwrap();
        let app = test::init_service(create_app(web::Data::new(state))).await;

        let req = as_admin(test::TestRequest::post().uri("/admin/permissions/assign"))
            .set_json(json!({"subject": subject, "role": "owner"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body: ApiResponse<()> = test::read_body_json(resp).await;
        assert!(!body.success);
        assert!(body.error.unwrap().contains("already assigned"));
    }

    #[actix_web::test]
    async fn test_assign_rejects_blank_fields() {
        let app = test::init_service(create_app(web::Data::new(admin_state().await))).await;

        let req = as_admin(test::TestRequest::post().uri("/admin/permissions/assign"))
            .set_json(json!({"subject": "  ", "role": "owner"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_revoke_present_and_absent() {
        let state = admin_state().await;
        let subject = SubjectFactory::unique();
        state.enforcer.add_role_for_user(&subject, "owner").await.unwrap();
        let app = test::init_service(create_app(web::Data::new(state.clone()))).await;

        let req = as_admin(test::TestRequest::post().uri("/admin/permissions/revoke"))
            .set_json(json!({"subject": subject, "role": "owner"}))
            .to_request();
        let body: ApiResponse<AssignmentOutcome> = test::call_and_read_body_json(&app, req).await;
        assert!(body.success);
        assert!(!body.data.unwrap().has_role);
        assert!(!state.enforcer.has_role(&subject, "owner"));

        let req = as_admin(test::TestRequest::post().uri("/admin/permissions/revoke"))
            .set_json(json!({"subject": subject, "role": "owner"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ApiResponse<AssignmentOutcome> = test::read_body_json(resp).await;
        assert!(body.message.unwrap().contains("did not hold"));
    }

    #[actix_web::test]
    async fn test_reload_endpoint() {
        let state = admin_state().await;
        let expected = state.enforcer.rule_count();
        let app = test::init_service(create_app(web::Data::new(state))).await;

        let req = as_admin(test::TestRequest::post().uri("/admin/permissions/reload")).to_request();
        let body: ApiResponse<usize> = test::call_and_read_body_json(&app, req).await;

        assert!(body.success);
        assert_eq!(body.data, Some(expected));
    }

    #[actix_web::test]
    async fn test_custom_subject_header() {
        let db = TestDatabase::new().await;
        let mut config = Config::default();
        config.server.subject_header = "X-Forwarded-Email".to_string();
        config.rbac.admin_subjects = vec![SubjectFactory::admin()];
        let enforcer = Arc::new(Enforcer::with_database(db.db_arc(), config.rbac()));
        import_default_policies(&enforcer, config.rbac()).await.unwrap();
        let state = AppState::new(config, StorageLayer::from_database(db.db_arc()), enforcer);
        let app = test::init_service(create_app(web::Data::new(state))).await;

        let req = as_admin(test::TestRequest::get().uri("/admin/permissions")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/admin/permissions")
            .insert_header(("X-Forwarded-Email", SubjectFactory::admin()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
