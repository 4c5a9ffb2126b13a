//! Shared helpers for router-level tests.

#![allow(dead_code)]

use alloy_primitives::B256;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use etherdoc::documents::{MockLedger, PinataClient};
use etherdoc::{AppState, AuthService, AuthSettings, DocumentService, Secrets, build_router};

pub const PINATA_JWT: &str = "pinata-test-jwt";
pub const JWT_SECRET: &str = "integration-test-secret";

pub fn admin_wallet() -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).unwrap()
}

pub fn other_wallet() -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(0x07)).unwrap()
}

pub fn sign(wallet: &PrivateKeySigner, message: &str) -> String {
    let sig = wallet.sign_message_sync(message.as_bytes()).unwrap();
    format!("0x{}", hex::encode(sig.as_bytes()))
}

/// Router wired to a pinning provider at `pinning_url` and in-memory ledgers.
pub fn app_with(pinning_url: &str, ethereum: MockLedger, base: MockLedger) -> Router {
    app_with_settings(pinning_url, ethereum, base, AuthSettings::default())
}

pub fn app_with_settings(
    pinning_url: &str,
    ethereum: MockLedger,
    base: MockLedger,
    settings: AuthSettings,
) -> Router {
    let secrets = Secrets {
        admin_address: admin_wallet().address().to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        pinning_jwt: PINATA_JWT.to_string(),
    };

    let auth = AuthService::from_config(&secrets, &settings).unwrap();
    let pinning = PinataClient::new(pinning_url, PINATA_JWT, Duration::from_secs(5)).unwrap();
    let documents = DocumentService::new(Arc::new(pinning), Arc::new(ethereum), Arc::new(base));

    build_router(Arc::new(AppState::new(auth, documents, settings)))
}

/// Router whose collaborators are never reached.
pub fn app() -> Router {
    app_with(
        "http://127.0.0.1:9",
        MockLedger::new("holesky"),
        MockLedger::new("base-sepolia"),
    )
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` part of a `Set-Cookie` header.
pub fn cookie_pair(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub struct IssuedChallenge {
    pub session_cookie: String,
    pub body: Value,
}

impl IssuedChallenge {
    pub fn message_string(&self) -> &str {
        self.body["messageString"].as_str().unwrap()
    }
}

pub async fn request_nonce(app: &Router, session_cookie: Option<&str>) -> IssuedChallenge {
    let mut builder = Request::get("/auth/nonce");
    if let Some(cookie) = session_cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let response = send(app, builder.body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let session_cookie = cookie_pair(&response);
    let body = json_body(response).await;
    IssuedChallenge {
        session_cookie,
        body,
    }
}

pub fn login_request(
    session_cookie: Option<&str>,
    signature: &str,
    message: Option<&str>,
) -> Request<Body> {
    let mut body = json!({ "signature": signature });
    if let Some(message) = message {
        body["message"] = json!(message);
    }

    let mut builder = Request::post("/auth/login").header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = session_cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Full challenge-response as the administrator; returns the access token.
pub async fn sign_in(app: &Router) -> String {
    let challenge = request_nonce(app, None).await;
    let signature = sign(&admin_wallet(), challenge.message_string());
    let response = send(
        app,
        login_request(Some(&challenge.session_cookie), &signature, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}
