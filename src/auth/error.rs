//! Authentication error types.
//!
//! Every variant carries the real cause for server-side logs. The HTTP body
//! only ever contains a generic message, so a caller cannot tell a bad
//! signature from a valid signature by the wrong key.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::gateway::types::ErrorBody;

pub const UNAUTHORIZED: &str = "Unauthorized";
pub const NONCE_MISSING: &str = "Nonce not found or expired. Please request a new nonce.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No credential presented")]
    MissingCredential,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Nonce not found or expired")]
    NonceExpiredOrMissing,

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Recovered address {recovered} is not the administrator")]
    AddressMismatch { recovered: String },

    #[error("Administrator privileges required")]
    Forbidden,

    #[error("Malformed login request: {0}")]
    BadRequest(String),

    #[error("Too many pending logins ({0} sessions)")]
    TooManyPending(usize),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::TooManyPending(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message safe to return to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::NonceExpiredOrMissing => NONCE_MISSING,
            Self::Forbidden => "Forbidden",
            Self::BadRequest(_) => "Malformed login request",
            Self::TooManyPending(_) => "Too many pending logins. Please retry later.",
            Self::Internal(_) => "Internal server error",
            _ => UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!("[AUTH] {}", self);
        } else {
            tracing::warn!("[AUTH] rejected: {}", self);
        }
        (status, Json(ErrorBody::new(status, self.public_message()))).into_response()
    }
}
