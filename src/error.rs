// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Every handler fault ends up here and is rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum AppError {
    // 400 Bad Request: email already registered
    DuplicateIdentity(String),

    // 401 Unauthorized: no account for the email
    UnknownIdentity(String),

    // 401 Unauthorized: password did not verify
    InvalidCredential(String),

    // 400 Bad Request: new password too short
    WeakSecret(String),

    // 401 Unauthorized: no bearer header
    MissingToken,

    // 403 Forbidden: bearer token failed verification
    InvalidToken,

    // 403 Forbidden: authenticated, but not the owner
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 400 Bad Request: missing or malformed input
    BadRequest(String),

    // 500 Internal Server Error. The detail is logged, never returned.
    ServerFault(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateIdentity(_) | AppError::WeakSecret(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UnknownIdentity(_)
            | AppError::InvalidCredential(_)
            | AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServerFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingToken => write!(f, "Authentication token required"),
            AppError::InvalidToken => write!(f, "Invalid authentication token"),
            AppError::ServerFault(_) => write!(f, "Internal Server Error"),
            AppError::DuplicateIdentity(msg)
            | AppError::UnknownIdentity(msg)
            | AppError::InvalidCredential(msg)
            | AppError::WeakSecret(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::ServerFault(detail) = &self {
            tracing::error!("Internal Server Error: {}", detail);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::ServerFault(err.to_string())
    }
}
