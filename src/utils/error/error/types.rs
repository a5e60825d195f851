//! Error types for the armory authorization service

use thiserror::Error;

/// Result type alias for the service
pub type Result<T> = std::result::Result<T, ArmoryError>;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ArmoryError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule with the same natural key is already stored
    #[error("Duplicate rule: {0}")]
    DuplicateRule(String),

    /// The rule set could not be (re)loaded into the enforcer
    #[error("Policy load error: {0}")]
    PolicyLoad(String),

    /// Delete targeted a rule that is not stored
    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    /// Default policies could not be seeded at startup
    #[error("Policy seed error: {0}")]
    PolicySeed(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or unusable caller identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks the required role or permission
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
