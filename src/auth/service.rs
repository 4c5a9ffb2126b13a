use crate::config::{AuthSettings, ConfigError, Secrets};

use super::challenge::{self, Challenge, ChallengeMessage};
use super::error::AuthError;
use super::models::{AdminAddress, AdminIdentity};
use super::nonce_store::NonceStore;
use super::signature::verify_admin_signature;
use super::token::TokenIssuer;

/// Challenge-response login for the single administrator.
pub struct AuthService {
    nonces: NonceStore,
    admin: AdminAddress,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(admin: AdminAddress, tokens: TokenIssuer, nonces: NonceStore) -> Self {
        Self {
            nonces,
            admin,
            tokens,
        }
    }

    pub fn from_config(secrets: &Secrets, settings: &AuthSettings) -> Result<Self, ConfigError> {
        let admin = AdminAddress::parse(&secrets.admin_address)?;
        let tokens = TokenIssuer::new(&secrets.jwt_secret, settings.token_lifetime())?;
        Ok(Self::new(
            admin,
            tokens,
            NonceStore::new(settings.nonce_ttl(), settings.max_pending_nonces),
        ))
    }

    pub fn admin(&self) -> &AdminAddress {
        &self.admin
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn nonces(&self) -> &NonceStore {
        &self.nonces
    }

    /// Issue a nonce for `session` and return the challenge the client must sign.
    pub fn issue_challenge(&self, session: &str) -> Result<Challenge, AuthError> {
        let nonce = self
            .nonces
            .issue(session)
            .map_err(|e| AuthError::TooManyPending(e.capacity))?;
        let challenge = challenge::build(self.admin.as_str(), nonce.value())
            .map_err(|e| AuthError::Internal(format!("Failed to serialize challenge: {}", e)))?;
        tracing::debug!("[AUTH] issued challenge for session {}", session);
        Ok(challenge)
    }

    /// Verify a signed challenge and mint an access token.
    ///
    /// The nonce is taken out of the store before anything else, so every
    /// attempt (successful or not) burns it.
    pub fn sign_in(
        &self,
        session: &str,
        signature: &str,
        client_message: Option<&str>,
    ) -> Result<String, AuthError> {
        // 1. Consume the outstanding nonce
        let nonce = self
            .nonces
            .take(session)
            .map_err(|_| AuthError::NonceExpiredOrMissing)?;

        // 2. Rebuild the challenge from server state
        let expected = challenge::build(self.admin.as_str(), nonce.value())
            .map_err(|e| AuthError::Internal(format!("Failed to serialize challenge: {}", e)))?;

        // 3. Pick the signed bytes
        let signed = match client_message {
            None => expected.message_string.as_str(),
            Some(raw) if raw == expected.message_string => raw,
            Some(raw) => {
                let parsed = ChallengeMessage::parse(raw).map_err(|e| {
                    AuthError::InvalidSignature(format!("Unparsable client message: {}", e))
                })?;
                if !parsed.is_equivalent(&expected.message_object) {
                    return Err(AuthError::InvalidSignature(
                        "Client message does not match the issued challenge".to_string(),
                    ));
                }
                raw
            }
        };

        // 4-5. Recover the signer and bind it to the administrator
        verify_admin_signature(signed.as_bytes(), signature, &self.admin)?;

        // 6. Mint the credential
        let token = self.tokens.issue(self.admin.as_str())?;
        tracing::info!("[AUTH] administrator {} signed in", self.admin.as_str());
        Ok(token)
    }

    /// Validate a presented credential.
    pub fn authenticate(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        self.tokens.verify(token).map(|claims| claims.identity())
    }
}
