//! Authentication gate for Axum.
//!
//! Resolves the bearer credential of a request (service cookie first, then
//! `Authorization: Bearer`), validates it and injects [`AdminIdentity`] into
//! the request extensions. Applied to every admin-only route.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::error::AuthError;
use crate::gateway::state::AppState;

/// Value of cookie `name`, if present and non-empty.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Token of an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// First credential source present wins: cookie, then header.
pub fn extract_credential<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    read_cookie(headers, cookie_name).or_else(|| extract_bearer(headers))
}

pub async fn admin_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    // 1. Extract credential
    let token = extract_credential(request.headers(), &state.settings.cookie_name)
        .ok_or(AuthError::MissingCredential)?;

    // 2. Verify token
    let identity = state.auth.authenticate(token)?;
    if !identity.is_admin {
        return Err(AuthError::Forbidden);
    }

    // 3. Inject identity
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
