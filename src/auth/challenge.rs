//! Login challenge construction.
//!
//! The challenge is a compact JSON object with the fixed field order
//! `address, message, nonce`. The client signs exactly this string, and the
//! server rebuilds it from its own state at sign-in; the field order comes
//! from the struct declaration order, so do not reorder the fields.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Purpose tag of the login challenge.
pub const LOGIN_PURPOSE: &str = "auth-login";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ChallengeMessage {
    #[schema(example = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F")]
    pub address: String,
    #[schema(example = "auth-login")]
    pub message: String,
    #[schema(example = "9b2c1d0e-4a53-4c8e-8f2e-0d9d1f4b7a21")]
    pub nonce: String,
}

/// A challenge in both structured and signed form.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub message_object: ChallengeMessage,
    pub message_string: String,
}

impl ChallengeMessage {
    pub fn new(address: &str, nonce: &str) -> Self {
        Self {
            address: address.to_string(),
            message: LOGIN_PURPOSE.to_string(),
            nonce: nonce.to_string(),
        }
    }

    /// Strict parse of a client-supplied challenge string.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Canonical string form, the bytes that get signed.
    pub fn canonical(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Same content regardless of serialization. Addresses compare case-insensitively.
    pub fn is_equivalent(&self, other: &ChallengeMessage) -> bool {
        self.nonce == other.nonce
            && self.message == other.message
            && self.address.eq_ignore_ascii_case(&other.address)
    }
}

/// Build the login challenge for `address` and `nonce`.
pub fn build(address: &str, nonce: &str) -> Result<Challenge, serde_json::Error> {
    let message_object = ChallengeMessage::new(address, nonce);
    let message_string = message_object.canonical()?;
    Ok(Challenge {
        message_object,
        message_string,
    })
}
