//! Policy enforcement integration tests
//!
//! Exercise the enforcer, importer and rule store together.

#[cfg(test)]
mod tests {
    use crate::common::assertions::EnforcerAssertions;
    use crate::common::{RuleFactory, SubjectFactory, TestDatabase};
    use crate::{assert_err, assert_ok};
    use armory_authz::config::RbacConfig;
    use armory_authz::{ArmoryError, Enforcer, RuleFilter, RuleKind, import_default_policies};
    use std::sync::Arc;

    async fn seeded(db: &TestDatabase, config: &RbacConfig) -> Enforcer {
        let enforcer = db.enforcer(config);
        assert_ok!(import_default_policies(&enforcer, config).await);
        enforcer
    }

    #[tokio::test]
    async fn test_seed_assign_remove_scenario() {
        let db = TestDatabase::new().await;
        let enforcer = seeded(&db, &RbacConfig::default()).await;
        let alice = "alice@example.com";
        let filter = RuleFilter::assignment(alice, "admin");

        assert_ok!(enforcer.add_role_for_user(alice, "admin").await);
        enforcer.assert_has_role(alice, "admin");
        assert_eq!(assert_ok!(enforcer.count(&filter).await), 1);

        assert!(assert_ok!(enforcer.remove_role_for_user(alice, "admin").await));
        enforcer.assert_lacks_role(alice, "admin");
        assert_eq!(assert_ok!(enforcer.count(&filter).await), 0);
    }

    #[tokio::test]
    async fn test_repeated_seeding_keeps_row_count() {
        let db = TestDatabase::new().await;
        let config = RbacConfig {
            admin_subjects: vec![SubjectFactory::admin()],
            ..RbacConfig::default()
        };

        let enforcer = seeded(&db, &config).await;
        let once = assert_ok!(enforcer.count(&RuleFilter::new()).await);

        for _ in 0..5 {
            assert_ok!(import_default_policies(&enforcer, &config).await);
        }

        assert_eq!(assert_ok!(enforcer.count(&RuleFilter::new()).await), once);
        assert_eq!(once as usize, config.seed_rules().len());
    }

    #[tokio::test]
    async fn test_seeding_from_a_second_enforcer() {
        let db = TestDatabase::new().await;
        let config = RbacConfig::default();
        let first = seeded(&db, &config).await;
        let second = seeded(&db, &config).await;

        assert_eq!(first.rule_count(), second.rule_count());
    }

    #[tokio::test]
    async fn test_all_roles_contains_admin_after_seeding() {
        let db = TestDatabase::new().await;
        let enforcer = seeded(&db, &RbacConfig::default()).await;

        let roles = enforcer.get_all_roles();
        assert!(roles.contains("admin"));
        assert!(roles.contains("owner"));
    }

    #[tokio::test]
    async fn test_duplicate_grouping_counted_once() {
        let db = TestDatabase::new().await;
        let enforcer = db.loaded_enforcer().await;
        let subject = SubjectFactory::unique();

        assert_ok!(enforcer.add_role_for_user(&subject, "owner").await);
        let err = assert_err!(enforcer.add_role_for_user(&subject, "owner").await);

        assert!(err.is_duplicate_rule());
        assert_eq!(
            assert_ok!(enforcer.count(&RuleFilter::assignment(&subject, "owner")).await),
            1
        );
    }

    #[tokio::test]
    async fn test_owner_permissions_from_baseline() {
        let db = TestDatabase::new().await;
        let enforcer = seeded(&db, &RbacConfig::default()).await;
        let owner = SubjectFactory::unique();
        assert_ok!(enforcer.add_role_for_user(&owner, "owner").await);

        for resource in ["guns", "calibers", "manufacturers", "weapon_types", "ammunition"] {
            enforcer.assert_allowed(&owner, resource, "read");
            enforcer.assert_allowed(&owner, resource, "write");
            enforcer.assert_denied(&owner, resource, "delete");
        }
        enforcer.assert_denied(&owner, "users", "read");
    }

    #[tokio::test]
    async fn test_admin_inherits_owner_and_wildcard() {
        let db = TestDatabase::new().await;
        let admin = SubjectFactory::admin();
        let config = RbacConfig {
            admin_subjects: vec![admin.clone()],
            ..RbacConfig::default()
        };
        let enforcer = seeded(&db, &config).await;

        enforcer.assert_has_role(&admin, "owner");
        enforcer.assert_allowed(&admin, "users", "delete");
        assert_eq!(
            enforcer.get_implicit_roles_for_user(&admin),
            vec!["admin", "owner"]
        );
    }

    #[tokio::test]
    async fn test_cycle_in_stored_rules() {
        let db = TestDatabase::new().await;
        let enforcer = db.loaded_enforcer().await;
        let member = SubjectFactory::unique();

        let mut rules = RuleFactory::role_cycle("r1", "r2");
        rules.push(RuleKind::grouping(&member, "r1"));
        rules.extend(RuleFactory::owner_access("guns"));
        assert_ok!(enforcer.save_policy(&rules).await);

        enforcer.assert_has_role("r1", "r2");
        enforcer.assert_has_role("r2", "r1");
        enforcer.assert_has_role(&member, "r2");
        enforcer.assert_lacks_role(&member, "owner");
        enforcer.assert_denied(&member, "guns", "read");
    }

    #[tokio::test]
    async fn test_chain_beyond_depth_bound() {
        let db = TestDatabase::new().await;
        let enforcer = db.loaded_enforcer().await;
        let subject = SubjectFactory::unique();

        assert_ok!(enforcer.save_policy(&RuleFactory::role_chain(&subject, 15)).await);

        // Default bound is ten hops
        enforcer.assert_has_role(&subject, "level9");
        enforcer.assert_lacks_role(&subject, "level10");
    }

    #[tokio::test]
    async fn test_writes_from_one_enforcer_visible_after_reload_in_another() {
        let db = TestDatabase::new().await;
        let writer = db.loaded_enforcer().await;
        let reader = db.loaded_enforcer().await;
        let subject = SubjectFactory::unique();

        assert_ok!(writer.add_role_for_user(&subject, "owner").await);
        reader.assert_lacks_role(&subject, "owner");

        assert_ok!(reader.load_policy().await);
        reader.assert_has_role(&subject, "owner");
    }

    #[tokio::test]
    async fn test_concurrent_assignments_all_land() {
        let db = TestDatabase::new().await;
        let enforcer = Arc::new(db.loaded_enforcer().await);

        let subjects: Vec<String> = (0..10).map(|_| SubjectFactory::unique()).collect();
        let mut handles = Vec::new();
        for subject in subjects.clone() {
            let enforcer = enforcer.clone();
            handles.push(tokio::spawn(async move {
                enforcer.add_role_for_user(&subject, "owner").await
            }));
        }
        for handle in handles {
            assert_ok!(handle.await.unwrap());
        }

        for subject in &subjects {
            enforcer.assert_has_role(subject, "owner");
        }
        assert_eq!(enforcer.get_users_for_role("owner").len(), subjects.len());
    }

    #[tokio::test]
    async fn test_unknown_rule_type_fails_reload() {
        use sea_orm::{ConnectionTrait, Statement};

        let db = TestDatabase::new().await;
        let enforcer = db.loaded_enforcer().await;
        let subject = SubjectFactory::unique();
        assert_ok!(enforcer.add_role_for_user(&subject, "owner").await);

        let conn = db.db().connection();
        conn.execute(Statement::from_string(
            conn.get_database_backend(),
            "INSERT INTO casbin_rule (ptype, v0, v1, v2, v3, v4, v5) VALUES ('g2', 'a', 'b', '', '', '', '')",
        ))
        .await
        .unwrap();

        let err = assert_err!(enforcer.load_policy().await);
        assert!(matches!(err, ArmoryError::PolicyLoad(_)));
        enforcer.assert_has_role(&subject, "owner");
    }
}
