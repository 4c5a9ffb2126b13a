use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

use super::challenge::ChallengeMessage;
use super::error::AuthError;
use super::middleware::read_cookie;
use crate::gateway::state::AppState;
use crate::gateway::types::ErrorBody;

/// Login challenge to be signed by the administrator wallet
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    pub message_object: ChallengeMessage,
    /// Exact string to sign with `personal_sign`
    #[schema(
        example = r#"{"address":"0x71C7656EC7ab88b098defB751B7401B5f6d8976F","message":"auth-login","nonce":"9b2c1d0e-4a53-4c8e-8f2e-0d9d1f4b7a21"}"#
    )]
    pub message_string: String,
    /// Session the nonce is bound to (also set as a cookie)
    pub session_id: String,
}

/// Signed challenge
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// 65-byte hex signature over the challenge
    #[schema(example = "0x5f1c...1b")]
    pub signature: String,
    /// Overrides the session cookie
    #[serde(default)]
    pub session_id: Option<String>,
    /// The challenge string as signed, when it differs from `messageString` only in layout
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// `Set-Cookie` value for an HttpOnly service cookie.
pub fn cookie_header(name: &str, value: &str, max_age: Duration) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        name,
        value,
        max_age.as_secs()
    )
}

/// Request a login nonce
///
/// GET /auth/nonce
#[utoipa::path(
    get,
    path = "/auth/nonce",
    responses(
        (status = 200, description = "Challenge issued", body = NonceResponse),
        (status = 429, description = "Too many pending logins", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn get_nonce(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let cookie_name = &state.settings.session_cookie_name;

    // Reusing the caller's session makes a new nonce replace its previous one
    let session_id = read_cookie(&headers, cookie_name)
        .filter(|s| Uuid::parse_str(s).is_ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let challenge = state.auth.issue_challenge(&session_id)?;
    let cookie = cookie_header(cookie_name, &session_id, state.auth.nonces().ttl());

    let body = NonceResponse {
        message_object: challenge.message_object,
        message_string: challenge.message_string,
        session_id,
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Sign in with a signed challenge
///
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Signed in, credential cookie set", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = ErrorBody),
        (status = 401, description = "Bad signature, wrong signer, or missing/expired nonce", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AuthError> {
    let Json(req) = body.map_err(|e| AuthError::BadRequest(e.body_text()))?;
    let session_id = req
        .session_id
        .as_deref()
        .or_else(|| read_cookie(&headers, &state.settings.session_cookie_name))
        .ok_or(AuthError::NonceExpiredOrMissing)?;

    let access_token = state
        .auth
        .sign_in(session_id, &req.signature, req.message.as_deref())?;

    let cookie = cookie_header(
        &state.settings.cookie_name,
        &access_token,
        state.auth.tokens().lifetime(),
    );

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { access_token }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_format() {
        let cookie = cookie_header("etherdoc-auth", "abc", Duration::from_secs(3600));
        assert_eq!(
            cookie,
            "etherdoc-auth=abc; HttpOnly; Path=/; SameSite=Lax; Max-Age=3600"
        );
    }

    #[test]
    fn test_login_request_minimal_body() {
        let req: LoginRequest = serde_json::from_str(r#"{"signature":"0xabc"}"#).unwrap();
        assert_eq!(req.signature, "0xabc");
        assert!(req.session_id.is_none());
        assert!(req.message.is_none());
    }

    #[test]
    fn test_login_response_shape() {
        let json = serde_json::to_value(LoginResponse {
            access_token: "t".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"accessToken": "t"}));
    }
}
