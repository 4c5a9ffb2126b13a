//! Identity types shared by the login flow and the auth gate.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::config::ConfigError;

/// The single identity allowed to sign in.
///
/// Keeps the configured string verbatim (it appears in the signed challenge
/// and in the token subject) next to its parsed form used for comparison.
#[derive(Debug, Clone)]
pub struct AdminAddress {
    raw: String,
    address: Address,
}

impl AdminAddress {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let address = Address::from_str(raw).map_err(|e| ConfigError::Invalid {
            key: "ADDRESS_ADMIN",
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: raw.to_string(),
            address,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Byte comparison, so hex casing never matters.
    pub fn matches(&self, other: &Address) -> bool {
        self.address == *other
    }
}

/// Identity attached to a request once the auth gate accepted its credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminIdentity {
    pub address: String,
    pub is_admin: bool,
}
