//! Bearer credential issuing and validation (HS256 JWT).

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::AuthError;
use super::models::AdminIdentity;
use crate::config::ConfigError;

/// JWT Claims structure. Anything else in the payload is rejected.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    pub sub: String, // Subject (administrator address)
    pub admin: bool,
    pub iat: u64, // Issued at
    pub exp: u64, // Expiration time (as UTC timestamp)
}

impl Claims {
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            address: self.sub.clone(),
            is_admin: self.admin,
        }
    }
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingEnv("JWT_SECRET"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Mint an admin token for `subject`.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: subject.to_string(),
            admin: true,
            iat: now,
            exp: now + self.lifetime.as_secs(),
        };
        self.encode_claims(&claims)
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verify JWT token
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let claims = token_data.claims;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }
        Ok(claims)
    }
}
