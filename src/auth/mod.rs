//! Administrator authentication.
//!
//! Wallet-signature challenge-response login for the single configured
//! administrator, followed by stateless JWT bearer credentials.
//!
//! ## Components
//! - `nonce_store`: per-session single-use nonces with TTL
//! - `challenge`: canonical login challenge
//! - `signature`: EIP-191 signer recovery
//! - `token`: JWT issuing and validation
//! - `service`: the sign-in flow tying the above together
//! - `middleware`: Axum auth gate for admin routes
//! - `handlers`: `/auth/nonce` and `/auth/login`

pub mod challenge;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod nonce_store;
pub mod service;
pub mod signature;
pub mod token;

pub use challenge::{Challenge, ChallengeMessage, LOGIN_PURPOSE};
pub use error::AuthError;
pub use middleware::{admin_auth_middleware, extract_credential};
pub use models::{AdminAddress, AdminIdentity};
pub use nonce_store::{Nonce, NonceNotFound, NonceStore};
pub use service::AuthService;
pub use signature::{recover_personal_sign, verify_admin_signature};
pub use token::{Claims, TokenIssuer};
