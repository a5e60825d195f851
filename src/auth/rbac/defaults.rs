//! Baseline policies and the startup importer

use crate::config::RbacConfig;
use crate::utils::error::{ArmoryError, Result};
use serde::Serialize;
use tracing::{debug, info};

use super::system::Enforcer;
use super::types::RuleKind;

/// Inventory resources owners manage
const OWNER_RESOURCES: &[&str] = &["guns", "calibers", "manufacturers", "weapon_types", "ammunition"];

/// Built-in rule set: admins may do anything and inherit every owner grant
pub fn baseline_policies() -> Vec<RuleKind> {
    let mut rules = vec![RuleKind::permission("admin", "*", "*")];
    for resource in OWNER_RESOURCES {
        rules.push(RuleKind::permission("owner", *resource, "read"));
        rules.push(RuleKind::permission("owner", *resource, "write"));
    }
    rules.push(RuleKind::grouping("admin", "owner"));
    rules
}

/// Outcome of a seeding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rules written by this pass
    pub inserted: usize,
    /// Rules that were already stored
    pub existing: usize,
}

impl Enforcer {
    /// Insert each of `rules` that is not stored yet, then reload
    ///
    /// Never deletes or rewrites stored rules, so it is safe on every startup.
    pub async fn import_policies(&self, rules: &[RuleKind]) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        let _guard = self.write_lock.lock().await;
        for rule in rules {
            rule.validate()
                .map_err(|e| ArmoryError::policy_seed(format!("invalid default rule: {}", e)))?;

            let stored = self
                .adapter
                .count(&rule.exact_filter())
                .await
                .map_err(|e| ArmoryError::policy_seed(format!("failed to check {}: {}", rule, e)))?;
            if stored > 0 {
                report.existing += 1;
                continue;
            }

            match self.adapter.add_rule(rule).await {
                Ok(()) => {
                    debug!("Seeded rule: {}", rule);
                    report.inserted += 1;
                }
                // Another instance seeded it first
                Err(e) if e.is_duplicate_rule() => report.existing += 1,
                Err(e) => {
                    return Err(ArmoryError::policy_seed(format!(
                        "failed to insert {}: {}",
                        rule, e
                    )));
                }
            }
        }

        self.reload_locked()
            .await
            .map_err(|e| ArmoryError::policy_seed(e.to_string()))?;

        info!(
            "Default policies imported: {} inserted, {} already present",
            report.inserted, report.existing
        );
        Ok(report)
    }
}

/// Seed the configured default policies and admin subjects
pub async fn import_default_policies(enforcer: &Enforcer, config: &RbacConfig) -> Result<ImportReport> {
    enforcer.import_policies(&config.seed_rules()).await
}
