//! Signature operations for the ETH and TON schemes.
//!
//! ETH signatures are secp256k1 ECDSA over `keccak256(prefix || canonical
//! payload)`. The primary form is the 65-byte recoverable `r || s || v`
//! layout (hex, low-S normalized, `v` in {27, 28}); the DER form is also
//! accepted and signed on request, and is the scheme's non-recoverable
//! variant. TON signatures are ed25519 over the payload bytes directly and
//! carry no recovery information.

use crate::keys::{PrivateKey, PublicKey};
use base64::{engine::general_purpose, Engine as _};
use ed25519_dalek::Signature as Ed25519Signature;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{
    RecoveryId, Signature as EcdsaSignature, SigningKey as Secp256k1PrivKey,
    VerifyingKey as Secp256k1PubKey,
};
use sha3::{Digest, Keccak256};
use signature::Verifier;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("signature verification failed")]
    VerificationFailed,
}

impl From<CryptoError> for quill_types::ChainError {
    fn from(err: CryptoError) -> Self {
        quill_types::ChainError::ValidationFailed {
            message: err.to_string(),
        }
    }
}

/// Sign a payload with the recoverable ETH form: 65-byte `r || s || v` hex.
pub fn sign_eth(key: &Secp256k1PrivKey, message: &[u8]) -> Result<String, CryptoError> {
    let digest = Keccak256::digest(message);
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(&digest)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    // Low-S normalization; flipping S flips the recovery parity.
    let (signature, recovery_id) = match signature.normalize_s() {
        Some(normalized) => {
            let flipped = RecoveryId::from_byte(recovery_id.to_byte() ^ 1)
                .ok_or_else(|| CryptoError::SigningFailed("recovery id out of range".into()))?;
            (normalized, flipped)
        }
        None => (signature, recovery_id),
    };

    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&signature.to_bytes());
    bytes[64] = 27 + (recovery_id.to_byte() & 1);
    Ok(hex::encode(bytes))
}

/// Sign a payload with the DER-encoded ETH form (non-recoverable).
pub fn sign_eth_der(key: &Secp256k1PrivKey, message: &[u8]) -> Result<String, CryptoError> {
    let digest = Keccak256::digest(message);
    let (signature, _) = key
        .sign_prehash_recoverable(&digest)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
    let signature = signature.normalize_s().unwrap_or(signature);
    Ok(hex::encode(signature.to_der().as_bytes()))
}

/// Recover the signer's public key from a recoverable ETH signature.
///
/// Returns `Ok(None)` when the signature is not the 65-byte recoverable
/// form (DER and raw 64-byte signatures carry no recovery information);
/// this is a normal outcome, distinct from a recovery failure.
pub fn recover_eth(signature: &str, message: &[u8]) -> Result<Option<String>, CryptoError> {
    let stripped = signature.strip_prefix("0x").unwrap_or(signature);
    let Ok(bytes) = hex::decode(stripped) else {
        return Ok(None);
    };
    if bytes.len() != 65 {
        return Ok(None);
    }
    let Ok(parsed) = EcdsaSignature::from_slice(&bytes[..64]) else {
        return Ok(None);
    };
    let recovery_id = match bytes[64] {
        0 | 27 => RecoveryId::from_byte(0),
        1 | 28 => RecoveryId::from_byte(1),
        _ => None,
    };
    let Some(recovery_id) = recovery_id else {
        return Ok(None);
    };

    let digest = Keccak256::digest(message);
    let recovered = Secp256k1PubKey::recover_from_prehash(&digest, &parsed, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;
    Ok(Some(hex::encode(
        recovered.to_encoded_point(false).as_bytes(),
    )))
}

/// Verify an ETH signature in any accepted form against a public key.
pub fn verify_eth(
    signature: &str,
    message: &[u8],
    public_key: &Secp256k1PubKey,
) -> Result<(), CryptoError> {
    let stripped = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes = hex::decode(stripped)
        .map_err(|e| CryptoError::InvalidSignature(format!("not hex: {e}")))?;

    let parsed = match bytes.len() {
        65 | 64 => EcdsaSignature::from_slice(&bytes[..64])
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?,
        _ => EcdsaSignature::from_der(&bytes)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?,
    };

    let digest = Keccak256::digest(message);
    public_key
        .verify_prehash(&digest, &parsed)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Sign a payload with the TON scheme: ed25519 over the raw bytes, base64.
pub fn sign_ton(key: &ed25519_dalek::SigningKey, message: &[u8]) -> String {
    use signature::Signer;
    let signature: Ed25519Signature = key.sign(message);
    general_purpose::STANDARD.encode(signature.to_bytes())
}

/// Verify a TON signature against an ed25519 public key.
pub fn verify_ton(
    signature: &str,
    message: &[u8],
    public_key: &ed25519_dalek::VerifyingKey,
) -> Result<(), CryptoError> {
    let bytes = general_purpose::STANDARD
        .decode(signature)
        .or_else(|_| hex::decode(signature))
        .map_err(|_| CryptoError::InvalidSignature("not base64 or hex".into()))?;
    let raw: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
        CryptoError::InvalidSignature(format!("expected 64-byte signature, got {}", bytes.len()))
    })?;
    public_key
        .verify(message, &Ed25519Signature::from_bytes(&raw))
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Verify a signature with whichever scheme the resolved key belongs to.
pub fn verify_signature(
    public_key: &PublicKey,
    signature: &str,
    message: &[u8],
) -> Result<(), CryptoError> {
    match public_key {
        PublicKey::Secp256k1(key) => verify_eth(signature, message, key),
        PublicKey::Ed25519(key) => verify_ton(signature, message, key),
    }
}

impl PrivateKey {
    /// Sign a message in the scheme's primary form.
    pub fn sign(&self, message: &[u8]) -> Result<String, CryptoError> {
        match self {
            PrivateKey::Secp256k1(key) => sign_eth(key, message),
            PrivateKey::Ed25519(key) => Ok(sign_ton(key, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::eth_address;
    use rand::rngs::OsRng;

    fn eth_key() -> Secp256k1PrivKey {
        Secp256k1PrivKey::random(&mut OsRng)
    }

    fn ton_key() -> ed25519_dalek::SigningKey {
        ed25519_dalek::SigningKey::from_bytes(&rand::random::<[u8; 32]>())
    }

    #[test]
    fn eth_sign_then_recover_yields_non_compact_key() {
        let key = eth_key();
        let message = b"payload bytes";
        let signature = sign_eth(&key, message).unwrap();

        let recovered = recover_eth(&signature, message).unwrap().unwrap();
        let expected = hex::encode(key.verifying_key().to_encoded_point(false).as_bytes());
        assert_eq!(recovered, expected);
    }

    #[test]
    fn eth_signature_layout_is_r_s_v() {
        let signature = sign_eth(&eth_key(), b"m").unwrap();
        let bytes = hex::decode(&signature).unwrap();
        assert_eq!(bytes.len(), 65);
        assert!(bytes[64] == 27 || bytes[64] == 28);
    }

    #[test]
    fn der_signature_is_not_recoverable_but_verifies() {
        let key = eth_key();
        let message = b"payload bytes";
        let signature = sign_eth_der(&key, message).unwrap();

        assert_eq!(recover_eth(&signature, message).unwrap(), None);
        assert!(verify_eth(&signature, message, key.verifying_key()).is_ok());
    }

    #[test]
    fn recover_on_garbage_is_not_recoverable() {
        assert_eq!(recover_eth("zz", b"m").unwrap(), None);
        assert_eq!(recover_eth("00aa", b"m").unwrap(), None);
    }

    #[test]
    fn recovery_of_tampered_message_yields_different_key() {
        let key = eth_key();
        let signature = sign_eth(&key, b"original").unwrap();
        let recovered = recover_eth(&signature, b"tampered").unwrap().unwrap();
        let expected = hex::encode(key.verifying_key().to_encoded_point(false).as_bytes());
        assert_ne!(recovered, expected);
    }

    #[test]
    fn eth_verify_rejects_wrong_key() {
        let key = eth_key();
        let other = eth_key();
        let message = b"payload";
        let signature = sign_eth(&key, message).unwrap();

        assert!(verify_eth(&signature, message, key.verifying_key()).is_ok());
        assert_eq!(
            verify_eth(&signature, message, other.verifying_key()),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn ton_round_trip_verifies_iff_key_matches() {
        let key = ton_key();
        let other = ton_key();
        let message = b"ton payload";
        let signature = sign_ton(&key, message);

        assert!(verify_ton(&signature, message, &key.verifying_key()).is_ok());
        assert_eq!(
            verify_ton(&signature, message, &other.verifying_key()),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn private_key_sign_dispatches_per_scheme() {
        let message = b"payload";

        let eth = PrivateKey::Secp256k1(eth_key());
        let signature = eth.sign(message).unwrap();
        assert!(verify_signature(&eth.public_key(), &signature, message).is_ok());

        let ton = PrivateKey::Ed25519(ton_key());
        let signature = ton.sign(message).unwrap();
        assert!(verify_signature(&ton.public_key(), &signature, message).is_ok());
    }

    #[test]
    fn address_of_recovered_key_matches_signer() {
        let key = eth_key();
        let message = b"payload";
        let signature = sign_eth(&key, message).unwrap();
        let recovered = recover_eth(&signature, message).unwrap().unwrap();

        let address = crate::address::eth_address_from_hex(&recovered).unwrap();
        assert_eq!(address, eth_address(key.verifying_key()));
    }
}
