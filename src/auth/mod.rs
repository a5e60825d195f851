//! Authorization for the armory service
//!
//! Authentication happens upstream; requests arrive with the subject already
//! established. This module decides what that subject may do.

pub mod rbac;

pub use rbac::{Enforcer, PolicyAdapter, RuleKind};
