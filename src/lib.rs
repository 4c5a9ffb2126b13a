//! Etherdoc - Document Registry Gateway
//!
//! HTTP backend for a document registry: a single administrator signs in
//! with a wallet signature, documents are looked up through a pinning
//! provider and verified against registry contracts on two chains.
//!
//! # Modules
//!
//! - [`config`] - YAML settings plus environment secrets
//! - [`logging`] - tracing subscriber setup
//! - [`auth`] - nonce challenge, signature recovery, JWT credentials, auth gate
//! - [`documents`] - pinning store and ledger collaborators
//! - [`gateway`] - Axum router, shared state, OpenAPI

pub mod auth;
pub mod config;
pub mod documents;
pub mod gateway;
pub mod logging;

pub use auth::{AuthError, AuthService};
pub use config::{AppConfig, AuthSettings, ConfigError, Secrets};
pub use documents::{DocumentError, DocumentService};
pub use gateway::{build_router, run_server, state::AppState};
