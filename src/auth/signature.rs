//! Wallet signature verification for admin login.
//!
//! Clients sign the challenge with `personal_sign` (EIP-191), which prefixes
//! the message with `"\x19Ethereum Signed Message:\n" + len` before hashing
//! with keccak256. The server never stores keys, it recovers the signer from
//! the signature and compares it with the configured administrator.

use alloy_primitives::{Address, Signature};

use super::error::AuthError;
use super::models::AdminAddress;

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// Decode a hex signature, with or without `0x` prefix.
pub fn decode_signature(raw: &str) -> Result<Vec<u8>, AuthError> {
    let trimmed = raw.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(hex_part)
        .map_err(|e| AuthError::InvalidSignature(format!("Invalid hex: {}", e)))?;

    if bytes.len() != SIGNATURE_LEN {
        return Err(AuthError::InvalidSignature(format!(
            "Expected {} bytes signature, got {}",
            SIGNATURE_LEN,
            bytes.len()
        )));
    }
    Ok(bytes)
}

/// Recover the signer of an EIP-191 personal message.
pub fn recover_personal_sign(message: &[u8], signature: &[u8]) -> Result<Address, AuthError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(AuthError::InvalidSignature(format!(
            "Signature must be {} bytes, got {}",
            SIGNATURE_LEN,
            signature.len()
        )));
    }

    let sig = Signature::try_from(signature)
        .map_err(|e| AuthError::InvalidSignature(format!("Malformed signature: {}", e)))?;

    sig.recover_address_from_msg(message)
        .map_err(|e| AuthError::InvalidSignature(format!("Recovery failed: {}", e)))
}

/// Recover the signer of `message` and require it to be the administrator.
pub fn verify_admin_signature(
    message: &[u8],
    signature_hex: &str,
    admin: &AdminAddress,
) -> Result<Address, AuthError> {
    let signature = decode_signature(signature_hex)?;
    let recovered = recover_personal_sign(message, &signature)?;

    if !admin.matches(&recovered) {
        return Err(AuthError::AddressMismatch {
            recovered: recovered.to_string(),
        });
    }
    Ok(recovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, eip191_hash_message};
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;

    fn signer(byte: u8) -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(byte)).expect("valid key")
    }

    fn sign_hex(signer: &PrivateKeySigner, message: &[u8]) -> String {
        let sig = signer.sign_message_sync(message).unwrap();
        format!("0x{}", hex::encode(sig.as_bytes()))
    }

    #[test]
    fn test_recover_personal_sign() {
        let wallet = signer(0x42);
        let message = br#"{"address":"0x1","message":"auth-login","nonce":"n"}"#;
        let sig = decode_signature(&sign_hex(&wallet, message)).unwrap();

        let recovered = recover_personal_sign(message, &sig).unwrap();
        assert_eq!(recovered, wallet.address());
    }

    #[test]
    fn test_digest_uses_personal_sign_prefix() {
        let mut prefixed = b"\x19Ethereum Signed Message:\n5".to_vec();
        prefixed.extend_from_slice(b"hello");
        assert_eq!(
            eip191_hash_message(b"hello"),
            alloy_primitives::keccak256(&prefixed)
        );
    }

    #[test]
    fn test_recover_over_other_message_differs() {
        let wallet = signer(0x42);
        let sig = decode_signature(&sign_hex(&wallet, b"message one")).unwrap();

        let recovered = recover_personal_sign(b"message two", &sig).unwrap();
        assert_ne!(recovered, wallet.address());
    }

    #[test]
    fn test_decode_accepts_unprefixed_hex() {
        let wallet = signer(0x42);
        let with_prefix = sign_hex(&wallet, b"hello");
        let without = with_prefix.trim_start_matches("0x");
        assert_eq!(
            decode_signature(&with_prefix).unwrap(),
            decode_signature(without).unwrap()
        );
    }

    #[test]
    fn test_decode_rejects_bad_hex() {
        let result = decode_signature("0xnothex");
        assert!(matches!(result, Err(AuthError::InvalidSignature(_))));
    }

    #[test]
    fn test_invalid_signature_length() {
        let result = decode_signature(&format!("0x{}", "ab".repeat(64)));
        assert!(matches!(result, Err(AuthError::InvalidSignature(_))));

        let result = recover_personal_sign(b"test", &[0u8; 66]);
        assert!(matches!(result, Err(AuthError::InvalidSignature(_))));
    }

    #[test]
    fn test_invalid_recovery_id() {
        let mut sig = [0u8; 65];
        sig[64] = 30;
        let result = recover_personal_sign(b"test", &sig);
        assert!(matches!(result, Err(AuthError::InvalidSignature(_))));
    }

    #[test]
    fn test_verify_admin_signature_authorized() {
        let wallet = signer(0x42);
        let admin = AdminAddress::parse(&wallet.address().to_string()).unwrap();
        let sig = sign_hex(&wallet, b"login");

        let recovered = verify_admin_signature(b"login", &sig, &admin).unwrap();
        assert_eq!(recovered, wallet.address());
    }

    #[test]
    fn test_verify_admin_signature_lowercase_config() {
        let wallet = signer(0x42);
        let lower = wallet.address().to_string().to_lowercase();
        let admin = AdminAddress::parse(&lower).unwrap();
        let sig = sign_hex(&wallet, b"login");

        assert!(verify_admin_signature(b"login", &sig, &admin).is_ok());
    }

    #[test]
    fn test_verify_admin_signature_not_authorized() {
        let admin_wallet = signer(0x42);
        let intruder = signer(0x07);
        let admin = AdminAddress::parse(&admin_wallet.address().to_string()).unwrap();
        let sig = sign_hex(&intruder, b"login");

        let result = verify_admin_signature(b"login", &sig, &admin);
        assert!(matches!(result, Err(AuthError::AddressMismatch { .. })));
    }
}
