//! Permission checks and grants

use crate::utils::error::Result;
use tracing::{debug, info};

use super::system::Enforcer;
use super::types::RuleKind;

impl Enforcer {
    /// Whether `subject` may perform `action` on `object`
    pub fn enforce(&self, subject: &str, object: &str, action: &str) -> bool {
        self.current()
            .is_some_and(|snapshot| snapshot.enforce(subject, object, action))
    }

    /// Allow holders of `role` to perform `action` on `object`
    pub async fn add_permission_for_role(&self, role: &str, object: &str, action: &str) -> Result<()> {
        let rule = RuleKind::permission(role, object, action);
        rule.validate()?;

        let _guard = self.write_lock.lock().await;
        self.adapter.add_rule(&rule).await?;
        info!("Granted {} on {} to role {}", action, object, role);

        self.reload_locked().await
    }

    /// Withdraw a permission; `Ok(false)` when it was not granted
    pub async fn remove_permission_for_role(
        &self,
        role: &str,
        object: &str,
        action: &str,
    ) -> Result<bool> {
        let rule = RuleKind::permission(role, object, action);

        let _guard = self.write_lock.lock().await;
        match self.adapter.remove_rule(&rule).await {
            Ok(()) => {}
            Err(e) if e.is_rule_not_found() => {
                debug!("Permission {} was not granted", rule);
                return Ok(false);
            }
            Err(e) => return Err(e),
        }
        info!("Withdrew {} on {} from role {}", action, object, role);

        self.reload_locked().await?;
        Ok(true)
    }

    /// Permission rules that apply to `subject` through itself or its roles
    pub fn get_permissions_for_user(&self, subject: &str) -> Vec<RuleKind> {
        self.current()
            .map(|snapshot| snapshot.implicit_permissions(subject))
            .unwrap_or_default()
    }
}
