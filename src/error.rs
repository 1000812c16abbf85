// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::models::ValidationError;
use crate::services::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid activity: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Stored data is corrupt: {0}")]
    CorruptData(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PersistenceUnavailable(e) => {
                AppError::PersistenceUnavailable(e.to_string())
            }
            StoreError::CorruptData(e) => AppError::CorruptData(e.to_string()),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Validation(err) => {
                (StatusCode::BAD_REQUEST, err.code(), Some(err.to_string()))
            }
            AppError::InvalidBody(rejection) => (
                StatusCode::BAD_REQUEST,
                "invalid_body",
                Some(rejection.body_text()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::PersistenceUnavailable(msg) => {
                tracing::warn!(error = %msg, "Persistence unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "persistence_unavailable",
                    Some(msg.clone()),
                )
            }
            AppError::CorruptData(msg) => {
                tracing::error!(error = %msg, "Corrupt stored data");
                (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_data", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
