//! # Armory Authz
//!
//! Authorization policy and role management for the Virtual Armory inventory
//! application.
//!
//! Rules are stored in a relational `casbin_rule` table and enforced from an
//! in-memory snapshot:
//!
//! - **Grouping rules** (`g, subject, role`) grant roles to subjects or to other roles
//! - **Permission rules** (`p, subject, object, action`) grant actions on resources
//! - **Default policies** are seeded idempotently at every startup
//! - **Back-office API** lets administrators assign and revoke roles
//!
//! ## Embedding the enforcer
//!
//! ```rust,no_run
//! use armory_authz::{Config, Enforcer, import_default_policies};
//! use armory_authz::storage::StorageLayer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/armory.yaml").await?;
//!     let storage = StorageLayer::new(config.storage()).await?;
//!     storage.migrate().await?;
//!
//!     let enforcer = Enforcer::with_database(storage.database.clone(), config.rbac());
//!     import_default_policies(&enforcer, config.rbac()).await?;
//!
//!     enforcer.add_role_for_user("alice@example.com", "owner").await?;
//!     assert!(enforcer.enforce("alice@example.com", "guns", "write"));
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use auth::rbac::{Enforcer, RuleFilter, RuleKind, RuleType, import_default_policies};
pub use config::Config;
pub use utils::error::{ArmoryError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information embedded at compile time
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix timestamp of the build
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

/// Build information for this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
