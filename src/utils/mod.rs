//! Utility modules for the armory authorization service
//!
//! - **error**: Error type, constructors and HTTP mapping
//! - **logging**: Subscriber setup and log-safe subject masking

pub mod error;
pub mod logging;
