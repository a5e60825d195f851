//! HTTP middleware implementations
//!
//! - Back-office guard requiring the administrator role
//! - Subject extraction from the authenticating proxy header

mod admin;
mod helpers;


pub use admin::{AdminGuard, AdminGuardService, Subject, current_subject};
pub use helpers::{extract_subject, is_admin_route};
