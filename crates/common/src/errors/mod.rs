//! Error types for PaperGraph services
//!
//! Provides the error taxonomy for the search pipeline:
//! - Caller errors (validation)
//! - Missing configuration prerequisites (credentials)
//! - Upstream failures (embedding, completion, graph store)
//! - HTTP status code mapping and structured error responses
//!
//! Most upstream failures never reach a caller: each component documents
//! the fallback value it substitutes. The variants below are what those
//! components see internally, plus the few errors that do cross the API.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,

    // Graph store errors (7xxx)
    GraphStoreError,

    // External service errors (8xxx)
    EmbeddingError,
    CompletionError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    MissingCredential,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,

            ErrorCode::GraphStoreError => 7001,

            ErrorCode::EmbeddingError => 8002,
            ErrorCode::CompletionError => 8003,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::MissingCredential => 9003,
            ErrorCode::SerializationError => 9004,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Graph store error: {message}")]
    GraphStore { message: String },

    #[error("Embedding service error: {message}")]
    Embedding { message: String },

    #[error("Completion service error: {message}")]
    Completion { message: String },

    /// A provider was used without its API key configured.
    #[error("Missing credential for {provider}: set {variable}")]
    MissingCredential { provider: String, variable: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::GraphStore { .. } => ErrorCode::GraphStoreError,
            AppError::Embedding { .. } => ErrorCode::EmbeddingError,
            AppError::Completion { .. } => ErrorCode::CompletionError,
            AppError::MissingCredential { .. } => ErrorCode::MissingCredential,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            AppError::MissingCredential { .. }
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 502 Bad Gateway
            AppError::Embedding { .. } | AppError::Completion { .. } => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            AppError::GraphStore { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Shorthand for a validation failure on a named field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let field = match &self {
            AppError::Validation { field, .. } => field.clone(),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                field,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Malformed or mistyped request bodies become validation errors so they
/// share the structured error body
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            message: rejection.body_text(),
            field: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::Completion {
            message: "timed out".into(),
        };
        assert_eq!(err.code(), ErrorCode::CompletionError);
        assert_eq!(err.code().as_code(), 8003);
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::validation("top_k", "must be at least 1");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_server_error());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_missing_credential_is_server_error() {
        let err = AppError::MissingCredential {
            provider: "embedding".into(),
            variable: "MISTRAL_API_KEY".into(),
        };
        assert_eq!(err.code(), ErrorCode::MissingCredential);
        assert!(err.is_server_error());
        assert!(err.to_string().contains("MISTRAL_API_KEY"));
    }

    #[test]
    fn test_upstream_errors_map_to_gateway_statuses() {
        let embedding = AppError::Embedding { message: "boom".into() };
        let graph = AppError::GraphStore { message: "down".into() };
        assert_eq!(embedding.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(graph.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(graph.code().as_code(), 7001);
    }
}
