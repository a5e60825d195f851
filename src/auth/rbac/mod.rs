//! Role-Based Access Control (RBAC) policy engine
//!
//! Rules live in the `casbin_rule` table; the [`Enforcer`] answers role and
//! permission queries from an in-memory snapshot rebuilt on every write.

mod adapter;
mod defaults;
mod permissions;
mod roles;
mod snapshot;
mod system;
mod types;

// Re-export public types and structs
pub use adapter::{DatabaseAdapter, PolicyAdapter};
pub use defaults::{ImportReport, baseline_policies, import_default_policies};
pub use snapshot::EnforcementSnapshot;
pub use system::Enforcer;
pub use types::{FIELD_COUNT, MAX_FIELD_LEN, RuleFilter, RuleKind, RuleType, WILDCARD};
