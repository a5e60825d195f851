//! Policy adapter bridging the rule store and the enforcer
//!
//! The enforcer only ever sees typed [`RuleKind`] values; the adapter owns the
//! translation to and from stored rows.

use crate::storage::database::Database;
use crate::utils::error::{ArmoryError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::types::{RuleFilter, RuleKind};

/// Persistence operations the enforcer needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PolicyAdapter: Send + Sync {
    /// Every stored rule, ordered by rule type then fields; empty on a fresh install
    async fn load_all_rules(&self) -> Result<Vec<RuleKind>>;

    /// Replace every stored rule (administrative reset)
    async fn save_policy(&self, rules: &[RuleKind]) -> Result<()>;

    /// Store one rule; `DuplicateRule` when already present
    async fn add_rule(&self, rule: &RuleKind) -> Result<()>;

    /// Delete exactly one rule; `RuleNotFound` when nothing matched
    async fn remove_rule(&self, rule: &RuleKind) -> Result<()>;

    /// Delete every rule matching a partial tuple
    async fn remove_filtered(&self, filter: &RuleFilter) -> Result<u64>;

    /// Number of stored rules matching a partial tuple
    async fn count(&self, filter: &RuleFilter) -> Result<u64>;
}

/// SeaORM-backed adapter over the `casbin_rule` table
#[derive(Debug, Clone)]
pub struct DatabaseAdapter {
    db: Arc<Database>,
}

impl DatabaseAdapter {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PolicyAdapter for DatabaseAdapter {
    async fn load_all_rules(&self) -> Result<Vec<RuleKind>> {
        let rows = self
            .db
            .find_all_rules()
            .await
            .map_err(|e| ArmoryError::policy_load(format!("rule store unavailable: {}", e)))?;

        rows.iter().map(|row| row.to_rule()).collect()
    }

    async fn save_policy(&self, rules: &[RuleKind]) -> Result<()> {
        debug!("Saving full policy of {} rules", rules.len());
        self.db.replace_all_rules(rules).await
    }

    async fn add_rule(&self, rule: &RuleKind) -> Result<()> {
        self.db.insert_rule(rule).await
    }

    async fn remove_rule(&self, rule: &RuleKind) -> Result<()> {
        match self.db.delete_rules(&rule.exact_filter()).await? {
            0 => Err(ArmoryError::rule_not_found(rule.to_string())),
            _ => Ok(()),
        }
    }

    async fn remove_filtered(&self, filter: &RuleFilter) -> Result<u64> {
        self.db.delete_rules(filter).await
    }

    async fn count(&self, filter: &RuleFilter) -> Result<u64> {
        self.db.count_rules(filter).await
    }
}
