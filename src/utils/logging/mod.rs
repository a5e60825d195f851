//! Logging utilities
//!
//! Subscriber setup and helpers for keeping subject identifiers out of logs.

mod sanitization;
mod subscriber;

pub use sanitization::mask_subject;
pub use subscriber::init_logging;
