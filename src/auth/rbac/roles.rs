//! Role assignment and lookup

use crate::utils::error::Result;
use crate::utils::logging::mask_subject;
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::system::Enforcer;
use super::types::{RuleFilter, RuleKind};

impl Enforcer {
    /// Whether `subject` holds `role`, directly or through role inheritance
    pub fn has_role(&self, subject: &str, role: &str) -> bool {
        self.current()
            .is_some_and(|snapshot| snapshot.has_role(subject, role))
    }

    /// Grant `role` to `subject` and reload
    ///
    /// Returns `DuplicateRule` when the assignment already exists. Once this
    /// returns `Ok`, every later query observes the assignment.
    pub async fn add_role_for_user(&self, subject: &str, role: &str) -> Result<()> {
        let rule = RuleKind::grouping(subject, role);
        rule.validate()?;

        let _guard = self.write_lock.lock().await;
        self.adapter.add_rule(&rule).await?;
        info!("Assigned role {} to {}", role, mask_subject(subject));

        self.reload_locked().await
    }

    /// Revoke `role` from `subject` and reload
    ///
    /// Returns `Ok(false)` when the assignment did not exist.
    pub async fn remove_role_for_user(&self, subject: &str, role: &str) -> Result<bool> {
        let rule = RuleKind::grouping(subject, role);

        let _guard = self.write_lock.lock().await;
        match self.adapter.remove_rule(&rule).await {
            Ok(()) => {}
            Err(e) if e.is_rule_not_found() => {
                debug!("Role {} was not assigned to {}", role, mask_subject(subject));
                return Ok(false);
            }
            Err(e) => return Err(e),
        }
        info!("Revoked role {} from {}", role, mask_subject(subject));

        self.reload_locked().await?;
        Ok(true)
    }

    /// Revoke every role held directly by `subject`
    pub async fn delete_user(&self, subject: &str) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let removed = self
            .adapter
            .remove_filtered(&RuleFilter::groupings_of(subject))
            .await?;
        info!("Removed {} role assignments of {}", removed, mask_subject(subject));

        if removed > 0 {
            self.reload_locked().await?;
        }
        Ok(removed)
    }

    /// Distinct role names, sorted
    ///
    /// A role is any grouping target or any subject holding a permission rule,
    /// so `admin` is listed as soon as the baseline is seeded.
    pub fn get_all_roles(&self) -> BTreeSet<String> {
        self.current()
            .map(|snapshot| snapshot.all_roles().clone())
            .unwrap_or_default()
    }

    /// Roles granted directly to `subject`
    pub fn get_roles_for_user(&self, subject: &str) -> Vec<String> {
        self.current()
            .map(|snapshot| snapshot.roles_for(subject))
            .unwrap_or_default()
    }

    /// Roles `subject` holds directly or by inheritance, nearest first
    pub fn get_implicit_roles_for_user(&self, subject: &str) -> Vec<String> {
        self.current()
            .map(|snapshot| snapshot.implicit_roles(subject))
            .unwrap_or_default()
    }

    /// Subjects holding `role` directly
    pub fn get_users_for_role(&self, role: &str) -> Vec<String> {
        self.current()
            .map(|snapshot| snapshot.holders_of(role))
            .unwrap_or_default()
    }
}
