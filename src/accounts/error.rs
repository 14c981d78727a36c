use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::accounts::{jwt::TokenError, repo::StoreError};

/// A rejected input field, rendered in the `errors` array of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("validation failed")]
    ValidationFailed(Vec<FieldError>),

    #[error("account already exists")]
    AlreadyExists,

    /// Unknown email and wrong password collapse into this one variant.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("token signing failed: {0}")]
    SigningFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniquenessViolation => AccountError::AlreadyExists,
            StoreError::Unavailable(msg) => AccountError::StoreUnavailable(msg),
        }
    }
}

impl From<TokenError> for AccountError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(msg) => AccountError::SigningFailed(msg),
            other => AccountError::Unauthorized(other.to_string()),
        }
    }
}

impl AccountError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccountError::ValidationFailed(_)
            | AccountError::AlreadyExists
            | AccountError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AccountError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AccountError::StoreUnavailable(_)
            | AccountError::SigningFailed(_)
            | AccountError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Server-side failures get a fixed string.
    pub fn user_message(&self) -> String {
        match self {
            AccountError::ValidationFailed(_) => "Invalid request".into(),
            AccountError::AlreadyExists => "User already exists".into(),
            AccountError::InvalidCredentials => "Invalid credentials".into(),
            AccountError::Unauthorized(msg) => msg.clone(),
            AccountError::StoreUnavailable(_)
            | AccountError::SigningFailed(_)
            | AccountError::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = match &self {
            AccountError::ValidationFailed(errors) => json!({ "errors": errors }),
            _ => json!({ "error": self.user_message() }),
        };
        (status, Json(body)).into_response()
    }
}
