use crate::auth::rbac::{RuleFilter, RuleKind};
use crate::utils::error::{ArmoryError, Result};
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, casbin_rule};
use super::types::SeaOrmDatabase;

/// Translate a partial-tuple filter into a SQL condition
fn filter_condition(filter: &RuleFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(rule_type) = filter.rule_type {
        condition = condition.add(casbin_rule::Column::Ptype.eq(rule_type.as_ptype()));
    }
    for (idx, value) in filter.values.iter().enumerate() {
        if let (Some(value), Some(column)) = (value, casbin_rule::value_column(idx)) {
            condition = condition.add(column.eq(value.as_str()));
        }
    }
    condition
}

/// Map unique-index violations to `DuplicateRule`
fn map_insert_error(err: DbErr, rule: &RuleKind) -> ArmoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ArmoryError::duplicate_rule(rule.to_string()),
        _ => ArmoryError::Database(err),
    }
}

impl SeaOrmDatabase {
    /// Append a rule row; fails with `DuplicateRule` when the tuple is stored
    pub async fn insert_rule(&self, rule: &RuleKind) -> Result<()> {
        debug!("Inserting rule: {}", rule.rule_type());

        if self.count_rules(&rule.exact_filter()).await? > 0 {
            return Err(ArmoryError::duplicate_rule(rule.to_string()));
        }

        entities::CasbinRule::insert(casbin_rule::Model::from_rule(rule))
            .exec(&self.db)
            .await
            .map_err(|e| map_insert_error(e, rule))?;

        Ok(())
    }

    /// Delete every row matching `filter`, returning the number removed
    pub async fn delete_rules(&self, filter: &RuleFilter) -> Result<u64> {
        let result = entities::CasbinRule::delete_many()
            .filter(filter_condition(filter))
            .exec(&self.db)
            .await
            .map_err(ArmoryError::Database)?;

        debug!("Deleted {} rule rows", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Every stored row, ordered by rule type then positional fields
    pub async fn find_all_rules(&self) -> Result<Vec<casbin_rule::Model>> {
        let rows = entities::CasbinRule::find()
            .order_by_asc(casbin_rule::Column::Ptype)
            .order_by_asc(casbin_rule::Column::V0)
            .order_by_asc(casbin_rule::Column::V1)
            .order_by_asc(casbin_rule::Column::V2)
            .order_by_asc(casbin_rule::Column::V3)
            .order_by_asc(casbin_rule::Column::V4)
            .order_by_asc(casbin_rule::Column::V5)
            .all(&self.db)
            .await
            .map_err(ArmoryError::Database)?;

        debug!("Loaded {} rule rows", rows.len());
        Ok(rows)
    }

    /// Number of rows matching `filter`
    pub async fn count_rules(&self, filter: &RuleFilter) -> Result<u64> {
        entities::CasbinRule::find()
            .filter(filter_condition(filter))
            .count(&self.db)
            .await
            .map_err(ArmoryError::Database)
    }

    /// Replace the whole table with `rules` in one transaction
    pub async fn replace_all_rules(&self, rules: &[RuleKind]) -> Result<()> {
        debug!("Replacing all rules with {} new rows", rules.len());

        let txn = self.db.begin().await.map_err(ArmoryError::Database)?;

        entities::CasbinRule::delete_many()
            .exec(&txn)
            .await
            .map_err(ArmoryError::Database)?;

        let mut models = Vec::with_capacity(rules.len());
        let mut seen = std::collections::HashSet::new();
        for rule in rules {
            if seen.insert(rule) {
                models.push(casbin_rule::Model::from_rule(rule));
            }
        }

        if !models.is_empty() {
            entities::CasbinRule::insert_many(models)
                .exec(&txn)
                .await
                .map_err(ArmoryError::Database)?;
        }

        txn.commit().await.map_err(ArmoryError::Database)?;
        Ok(())
    }
}
