//! Database integration tests
//!
//! Tests rule store operations using a real in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use armory_authz::storage::database::Database;
    use armory_authz::{ArmoryError, RuleFilter, RuleKind, RuleType};

    #[tokio::test]
    async fn test_database_migration_is_repeatable() {
        let db = TestDatabase::new().await;
        assert!(db.db().migrate().await.is_ok());
        assert!(db.db().health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_fresh_store_is_empty() {
        let db = TestDatabase::new().await;

        let rows = db.db().find_all_rules().await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(db.db().count_rules(&RuleFilter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_and_find_ordered() {
        let db = TestDatabase::new().await;
        let rules = [
            RuleKind::permission("owner", "guns", "write"),
            RuleKind::grouping("bob@example.com", "owner"),
            RuleKind::permission("admin", "*", "*"),
            RuleKind::grouping("alice@example.com", "admin"),
        ];
        for rule in &rules {
            db.db().insert_rule(rule).await.unwrap();
        }

        let loaded: Vec<RuleKind> = db
            .db()
            .find_all_rules()
            .await
            .unwrap()
            .iter()
            .map(|row| row.to_rule().unwrap())
            .collect();

        assert_eq!(
            loaded,
            vec![
                RuleKind::grouping("alice@example.com", "admin"),
                RuleKind::grouping("bob@example.com", "owner"),
                RuleKind::permission("admin", "*", "*"),
                RuleKind::permission("owner", "guns", "write"),
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let db = TestDatabase::new().await;
        let rule = RuleKind::grouping("alice@example.com", "admin");

        db.db().insert_rule(&rule).await.unwrap();
        let err = db.db().insert_rule(&rule).await.unwrap_err();

        assert!(matches!(err, ArmoryError::DuplicateRule(_)));
        assert_eq!(db.db().count_rules(&rule.exact_filter()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_filters() {
        let db = TestDatabase::new().await;
        for rule in [
            RuleKind::grouping("alice@example.com", "admin"),
            RuleKind::grouping("alice@example.com", "owner"),
            RuleKind::grouping("bob@example.com", "owner"),
            RuleKind::permission("owner", "guns", "read"),
        ] {
            db.db().insert_rule(&rule).await.unwrap();
        }

        let store = db.db();
        assert_eq!(
            store
                .count_rules(&RuleFilter::groupings_of("alice@example.com"))
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            store.count_rules(&RuleFilter::holders_of("owner")).await.unwrap(),
            2
        );
        assert_eq!(
            store
                .count_rules(&RuleFilter::new().rule_type(RuleType::Permission))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_by_filter() {
        let db = TestDatabase::new().await;
        for rule in [
            RuleKind::grouping("alice@example.com", "admin"),
            RuleKind::grouping("alice@example.com", "owner"),
            RuleKind::grouping("bob@example.com", "owner"),
        ] {
            db.db().insert_rule(&rule).await.unwrap();
        }

        let removed = db
            .db()
            .delete_rules(&RuleFilter::groupings_of("alice@example.com"))
            .await
            .unwrap();
        assert_eq!(removed, 2);

        // Zero matches is not an error
        let removed = db
            .db()
            .delete_rules(&RuleFilter::assignment("carol@example.com", "owner"))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(db.db().count_rules(&RuleFilter::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_all_rules() {
        let db = TestDatabase::new().await;
        db.db()
            .insert_rule(&RuleKind::grouping("alice@example.com", "admin"))
            .await
            .unwrap();

        let replacement = vec![
            RuleKind::permission("owner", "ammunition", "read"),
            RuleKind::permission("owner", "ammunition", "read"),
            RuleKind::grouping("bob@example.com", "owner"),
        ];
        db.db().replace_all_rules(&replacement).await.unwrap();

        assert_eq!(db.db().count_rules(&RuleFilter::new()).await.unwrap(), 2);

        db.db().replace_all_rules(&[]).await.unwrap();
        assert_eq!(db.db().count_rules(&RuleFilter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_backed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("armory.db");
        let config = armory_authz::config::DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: 2,
            ..Default::default()
        };

        let db = Database::new(&config).await.unwrap();
        db.migrate().await.unwrap();
        db.insert_rule(&RuleKind::grouping("alice@example.com", "admin"))
            .await
            .unwrap();
        db.close().await.unwrap();

        let reopened = Database::new(&config).await.unwrap();
        assert_eq!(reopened.count_rules(&RuleFilter::new()).await.unwrap(), 1);
    }
}
