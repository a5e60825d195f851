//! Configuration validation
//!
//! Each section of [`Config`](crate::config::Config) checks its own settings;
//! startup stops at the first error.

mod config_validators;

/// A configuration section that can check its own settings
pub trait Validate {
    /// `Err` names the offending setting
    fn validate(&self) -> Result<(), String>;
}
