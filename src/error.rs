// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::StoreError;
use crate::services::engine::LifecycleError;
use crate::services::export::ExportError;
use crate::services::routing::RoutingError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid state: {0}")]
    InvalidState(#[from] LifecycleError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
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
            AppError::InvalidState(err) => {
                (StatusCode::CONFLICT, "invalid_state", Some(err.to_string()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Routing(RoutingError::NoRouteFound) => {
                (StatusCode::NOT_FOUND, "no_route_found", None)
            }
            AppError::Routing(err @ (RoutingError::TooFewPoints | RoutingError::InvalidCoordinate)) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(err.to_string()))
            }
            AppError::Routing(err) => {
                tracing::warn!(error = %err, "Routing error");
                (StatusCode::BAD_GATEWAY, "routing_error", Some(err.to_string()))
            }
            AppError::Export(err) => {
                tracing::error!(error = %err, "Export error");
                (StatusCode::INTERNAL_SERVER_ERROR, "export_error", Some(err.to_string()))
            }
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
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
