//! Helper functions for creating specific error types

use super::types::ArmoryError;

/// Helper functions for creating specific errors
impl ArmoryError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn duplicate_rule<S: Into<String>>(message: S) -> Self {
        Self::DuplicateRule(message.into())
    }

    pub fn policy_load<S: Into<String>>(message: S) -> Self {
        Self::PolicyLoad(message.into())
    }

    pub fn rule_not_found<S: Into<String>>(message: S) -> Self {
        Self::RuleNotFound(message.into())
    }

    pub fn policy_seed<S: Into<String>>(message: S) -> Self {
        Self::PolicySeed(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error reports an already-present rule
    pub fn is_duplicate_rule(&self) -> bool {
        matches!(self, Self::DuplicateRule(_))
    }

    /// Whether this error reports a missing rule
    pub fn is_rule_not_found(&self) -> bool {
        matches!(self, Self::RuleNotFound(_))
    }
}
