//! RBAC configuration

use super::*;
use crate::auth::rbac::{RuleKind, baseline_policies};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// RBAC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Role required by the permissions back-office
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
    /// Subjects granted `admin_role` when policies are first seeded
    #[serde(default)]
    pub admin_subjects: Vec<String>,
    /// Baseline rules imported at every startup (only missing ones are inserted)
    #[serde(default = "baseline_policies")]
    pub default_policies: Vec<RuleKind>,
    /// Maximum number of role-to-role hops followed by inheritance checks
    #[serde(default = "default_max_role_depth")]
    pub max_role_depth: usize,
    /// Upper bound on a full policy reload, in seconds
    #[serde(default = "default_reload_timeout")]
    pub reload_timeout_secs: u64,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            admin_role: default_admin_role(),
            admin_subjects: Vec::new(),
            default_policies: baseline_policies(),
            max_role_depth: default_max_role_depth(),
            reload_timeout_secs: default_reload_timeout(),
        }
    }
}

impl RbacConfig {
    /// Reload timeout as a `Duration`
    pub fn reload_timeout(&self) -> Duration {
        Duration::from_secs(self.reload_timeout_secs)
    }

    /// Every rule the importer should guarantee, including admin grants
    pub fn seed_rules(&self) -> Vec<RuleKind> {
        let mut rules = self.default_policies.clone();
        rules.extend(
            self.admin_subjects
                .iter()
                .map(|subject| RuleKind::grouping(subject.clone(), self.admin_role.clone())),
        );
        rules
    }
}
