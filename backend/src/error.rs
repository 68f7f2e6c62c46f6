//! Error handling for the HeatLens backend
//!
//! Provides consistent JSON error responses across all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The endpoint depends on an API key that is not configured
    #[error("Feature disabled: {0}")]
    FeatureDisabled(&'static str),

    // External service errors
    #[error("Imagery provider error: {0}")]
    ImageryProvider(String),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.to_string()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::FeatureDisabled(feature) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "FEATURE_DISABLED".to_string(),
                    message: format!(
                        "{} is not configured on this deployment",
                        feature
                    ),
                    field: None,
                },
            ),
            AppError::ImageryProvider(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "IMAGERY_PROVIDER_ERROR".to_string(),
                    message: format!("Imagery provider error: {}", msg),
                    field: None,
                },
            ),
            AppError::LlmProvider(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "LLM_PROVIDER_ERROR".to_string(),
                    message: format!("LLM provider error: {}", msg),
                    field: None,
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message: format!("External service error: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
