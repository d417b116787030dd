use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::error;

use crate::auth::repo::RepoError;

pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Email address is already in use")]
    DuplicateEmail,

    /// Used for both unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("unexpected error: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl From<RepoError> for AuthError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::DuplicateEmail => AuthError::DuplicateEmail,
            RepoError::Other(e) => AuthError::Unexpected(e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Sanitized 500 used for every failure that must not leak details.
pub fn unexpected_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(UNEXPECTED_MESSAGE)),
    )
        .into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Validation(_) | AuthError::DuplicateEmail | AuthError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(self.to_string()))).into_response()
            }
            AuthError::Unexpected(e) => {
                error!(error = %format!("{e:#}"), "unexpected error");
                unexpected_response()
            }
        }
    }
}
