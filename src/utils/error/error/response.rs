//! HTTP response handling for errors

use super::types::ArmoryError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ArmoryError {
    /// Status code and machine-readable code for this error
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ArmoryError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            ArmoryError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ArmoryError::DuplicateRule(_) => (StatusCode::CONFLICT, "DUPLICATE_RULE"),
            ArmoryError::PolicyLoad(_) => (StatusCode::INTERNAL_SERVER_ERROR, "POLICY_LOAD_ERROR"),
            ArmoryError::RuleNotFound(_) => (StatusCode::NOT_FOUND, "RULE_NOT_FOUND"),
            ArmoryError::PolicySeed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "POLICY_SEED_ERROR"),
            ArmoryError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ArmoryError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ArmoryError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ArmoryError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ArmoryError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            ArmoryError::Serialization(_) | ArmoryError::Yaml(_) => {
                (StatusCode::BAD_REQUEST, "PARSING_ERROR")
            }
            ArmoryError::Io(_) | ArmoryError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }

    /// Message that is safe to show to the browser
    pub fn public_message(&self) -> String {
        match self {
            ArmoryError::Database(_) => "Database operation failed".to_string(),
            ArmoryError::Io(_) | ArmoryError::Internal(_) => {
                "An internal error occurred".to_string()
            }
            ArmoryError::PolicyLoad(_) => {
                "Permissions could not be refreshed, please retry".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ArmoryError {
    fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.classify();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message: self.public_message(),
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
