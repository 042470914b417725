//! Custom error types for the usuarios service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned for every store failure
pub const INTERNAL_ERROR: &str = "Error interno del servidor";
/// Message returned when no matching row exists
pub const NOT_FOUND: &str = "Usuario no encontrado";

/// Custom error type for the usuarios service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No row matches the id under the operation's precondition
    #[error("Not found")]
    NotFound,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    /// Log a store failure with the operation that triggered it and wrap it
    pub fn store(context: &'static str) -> impl FnOnce(DatabaseError) -> ApiError {
        move |e| {
            error!("{}: {}", context, e);
            ApiError::Database(e)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, mensaje) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND.to_string()),
            // Driver detail stays in the logs.
            ApiError::InternalServerError | ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR.to_string(),
            ),
        };

        let body = Json(json!({
            "mensaje": mensaje,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
