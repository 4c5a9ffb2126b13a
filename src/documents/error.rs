use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::gateway::types::ErrorBody;

/// Failure of a single chain read.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document with CID: {0} is not found.")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Pinning provider returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocumentError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(_) | Self::InvalidRequest(_) => self.to_string(),
            Self::Upstream { .. } => "Error from pinning provider".to_string(),
            Self::Unavailable(_) => "Storage provider temporarily unavailable".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<reqwest::Error> for DocumentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Internal(format!("Unreadable pinning response: {}", e))
        } else {
            Self::Unavailable(e.to_string())
        }
    }
}

impl IntoResponse for DocumentError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        match &self {
            Self::NotFound(_) | Self::InvalidRequest(_) => {
                tracing::debug!("[DOCS] {}", self)
            }
            Self::Upstream { .. } | Self::Unavailable(_) => tracing::warn!("[DOCS] {}", self),
            Self::Internal(_) => tracing::error!("[DOCS] {}", self),
        }
        (status, Json(ErrorBody::new(status, self.public_message()))).into_response()
    }
}
