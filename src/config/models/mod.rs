//! Configuration data models
//!
//! This module defines all configuration structures used by the service.

#![allow(missing_docs)]

pub mod logging;
pub mod rbac;
pub mod server;
pub mod storage;

pub use logging::*;
pub use rbac::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

/// Header carrying the already-authenticated subject
pub fn default_subject_header() -> String {
    "X-Authenticated-User".to_string()
}

pub fn default_database_url() -> String {
    "sqlite://data/armory.db?mode=rwc".to_string()
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_admin_role() -> String {
    "admin".to_string()
}

/// Casbin's conventional hierarchy limit
pub fn default_max_role_depth() -> usize {
    10
}

pub fn default_reload_timeout() -> u64 {
    10
}

pub fn default_log_level() -> String {
    "info".to_string()
}
