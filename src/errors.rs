// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("No account found for this phone number")]
    UserNotFound,

    #[error("Invalid or expired OTP code")]
    OtpInvalid,

    #[error("Invalid reset token")]
    TokenInvalid,

    #[error("Reset token has expired")]
    TokenExpired,

    #[error("Reset token was issued for a different purpose")]
    TokenPurposeMismatch,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("SMS delivery failed: {0}")]
    SmsDelivery(String),

    #[error("Password hashing error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Service error: {0}")]
    ServiceError(String),
}

impl IntoResponse for AppError {

    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MongoDB(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AppError::OtpInvalid => (StatusCode::BAD_REQUEST, "OTP verification failed".to_string()),
            AppError::TokenInvalid => (StatusCode::UNAUTHORIZED, "Invalid reset token".to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "Reset token expired".to_string()),
            AppError::TokenPurposeMismatch => (StatusCode::UNAUTHORIZED, "Invalid reset token".to_string()),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "Validation failed".to_string()),
            AppError::SmsDelivery(_) => (StatusCode::BAD_GATEWAY, "SMS delivery failed".to_string()),
            AppError::Bcrypt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Password processing error".to_string()),
            AppError::ExternalApi(_) => (StatusCode::BAD_GATEWAY, "External API error".to_string()),
            AppError::ServiceError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

// Manual From implementations
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApi(format!("HTTP request failed: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        AppError::ServiceError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
