//! Configuration section validators

use super::Validate;
use crate::auth::rbac::RuleKind;
use crate::config::Config;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating configuration");

        self.server.validate()?;
        self.storage.database.validate()?;
        self.rbac.validate()?;
        self.logging.validate()?;

        debug!("Configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.timeout == 0 {
            return Err("Timeout cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            return Err("Max body size cannot be 0".to_string());
        }

        if self.workers == Some(0) {
            return Err("Worker count cannot be 0".to_string());
        }

        if self.subject_header.trim().is_empty() {
            return Err("Subject header name cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        let supported = ["sqlite:", "postgres://", "postgresql://"];
        if !supported.iter().any(|scheme| self.url.starts_with(scheme)) {
            return Err(format!("Unsupported database URL scheme: {}", self.url));
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.is_in_memory() && self.max_connections != 1 {
            return Err("In-memory SQLite requires exactly one connection".to_string());
        }

        Ok(())
    }
}

impl Validate for RbacConfig {
    fn validate(&self) -> Result<(), String> {
        if self.admin_role.trim().is_empty() {
            return Err("RBAC admin role cannot be empty".to_string());
        }

        if self.max_role_depth == 0 {
            return Err("RBAC max role depth must be at least 1".to_string());
        }

        if self.reload_timeout_secs == 0 {
            return Err("RBAC reload timeout cannot be 0".to_string());
        }

        if self.admin_subjects.iter().any(|s| s.trim().is_empty()) {
            return Err("RBAC admin subjects cannot contain empty entries".to_string());
        }

        // Admin grants are seeded alongside the defaults
        let rules = self.seed_rules();
        let mut seen: HashSet<&RuleKind> = HashSet::new();
        for rule in &rules {
            rule.validate().map_err(|e| format!("Invalid default policy '{}': {}", rule, e))?;
            if !seen.insert(rule) {
                return Err(format!("Duplicate default policy: {}", rule));
            }
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))
    }
}
