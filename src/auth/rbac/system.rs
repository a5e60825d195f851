//! Enforcer core: construction, snapshot publication and reloads

use crate::config::RbacConfig;
use crate::storage::database::Database;
use crate::utils::error::{ArmoryError, Result};
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::adapter::{DatabaseAdapter, PolicyAdapter};
use super::snapshot::EnforcementSnapshot;
use super::types::{RuleFilter, RuleKind};

/// Policy enforcement engine
///
/// Queries read the current [`EnforcementSnapshot`] without locking. Writes and
/// reloads are serialized through `write_lock`, so snapshots are published in
/// the order the writes happened.
pub struct Enforcer {
    pub(super) adapter: Arc<dyn PolicyAdapter>,
    pub(super) snapshot: ArcSwapOption<EnforcementSnapshot>,
    pub(super) write_lock: Mutex<()>,
    pub(super) max_role_depth: usize,
    pub(super) reload_timeout: Duration,
}

impl fmt::Debug for Enforcer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enforcer")
            .field("loaded", &self.is_loaded())
            .field("rule_count", &self.rule_count())
            .field("max_role_depth", &self.max_role_depth)
            .field("reload_timeout", &self.reload_timeout)
            .finish()
    }
}

impl Enforcer {
    /// Create an unloaded enforcer; call [`Enforcer::load_policy`] before use
    pub fn new(adapter: Arc<dyn PolicyAdapter>, config: &RbacConfig) -> Self {
        Self {
            adapter,
            snapshot: ArcSwapOption::empty(),
            write_lock: Mutex::new(()),
            max_role_depth: config.max_role_depth,
            reload_timeout: config.reload_timeout(),
        }
    }

    /// Create an enforcer backed by the `casbin_rule` table
    pub fn with_database(db: Arc<Database>, config: &RbacConfig) -> Self {
        Self::new(Arc::new(DatabaseAdapter::new(db)), config)
    }

    /// Rebuild the snapshot from storage
    ///
    /// On failure the previously published snapshot stays in place.
    pub async fn load_policy(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.reload_locked().await
    }

    /// Reload while the caller holds `write_lock`
    pub(super) async fn reload_locked(&self) -> Result<()> {
        let loaded = tokio::time::timeout(self.reload_timeout, self.adapter.load_all_rules()).await;

        let rules = match loaded {
            Ok(Ok(rules)) => rules,
            Ok(Err(e)) => {
                warn!("Policy reload failed, keeping previous snapshot: {}", e);
                return Err(match e {
                    ArmoryError::PolicyLoad(_) => e,
                    other => ArmoryError::policy_load(other.to_string()),
                });
            }
            Err(_) => {
                warn!(
                    "Policy reload timed out after {:?}, keeping previous snapshot",
                    self.reload_timeout
                );
                return Err(ArmoryError::policy_load(format!(
                    "reload timed out after {:?}",
                    self.reload_timeout
                )));
            }
        };

        let snapshot = EnforcementSnapshot::build(&rules, self.max_role_depth);
        let count = snapshot.rule_count();
        self.snapshot.store(Some(Arc::new(snapshot)));

        info!("Policy loaded: {} rules", count);
        Ok(())
    }

    /// Current snapshot, if any has been published
    pub(super) fn current(&self) -> Option<Arc<EnforcementSnapshot>> {
        self.snapshot.load_full()
    }

    /// Whether a snapshot has been published
    pub fn is_loaded(&self) -> bool {
        self.snapshot.load().is_some()
    }

    /// Rules in the published snapshot; zero while unloaded
    pub fn rule_count(&self) -> usize {
        self.current().map(|s| s.rule_count()).unwrap_or(0)
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.current().map(|s| s.loaded_at())
    }

    /// Number of stored rules matching `filter`
    pub async fn count(&self, filter: &RuleFilter) -> Result<u64> {
        self.adapter.count(filter).await
    }

    /// Replace every stored rule with `rules`, then reload
    pub async fn save_policy(&self, rules: &[RuleKind]) -> Result<()> {
        for rule in rules {
            rule.validate()?;
        }

        let _guard = self.write_lock.lock().await;
        self.adapter.save_policy(rules).await?;
        debug!("Stored policy replaced with {} rules", rules.len());
        self.reload_locked().await
    }
}
