//! Error handling for both handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Secret unavailable: {name} - {message}")]
    SecretUnavailable { name: String, message: String },

    #[error("Store error during {operation}: {message}")]
    Store { operation: String, message: String },

    #[error("Invalid StateChangeTime '{value}': {reason}")]
    TimestampParse { value: String, reason: String },

    #[error("Malformed event: {message}")]
    MalformedEvent { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Webhook delivery failed: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn secret_unavailable(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecretUnavailable {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn timestamp_parse(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TimestampParse {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_event(message: impl Into<String>) -> Self {
        Self::MalformedEvent {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SecretUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Store { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::TimestampParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MalformedEvent { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Webhook(_) => StatusCode::BAD_GATEWAY,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::SecretUnavailable { .. } => "SECRET_UNAVAILABLE",
            AppError::Store { .. } => "STORE_ERROR",
            AppError::TimestampParse { .. } => "TIMESTAMP_PARSE_ERROR",
            AppError::MalformedEvent { .. } => "MALFORMED_EVENT",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Configuration { .. } => "CONFIG_ERROR",
            AppError::Webhook(_) => "WEBHOOK_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Body shared by the Lambda proxy response and the dev server.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
            code: self.status_code().as_u16().to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::TimestampParse { value, .. } => {
                Some(serde_json::json!({ "state_change_time": value }))
            }
            AppError::SecretUnavailable { name, .. } => Some(serde_json::json!({ "parameter": name })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        tracing::error!(error_code = self.error_code(), "API Error: {}", self);

        (status, Json(error_response)).into_response()
    }
}
