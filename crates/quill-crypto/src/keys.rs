//! Key representations using static enum dispatch.

use crate::address;
use crate::signature::CryptoError;
use base64::{engine::general_purpose, Engine as _};
use ed25519_dalek::{SigningKey as Ed25519PrivKey, VerifyingKey as Ed25519PubKey};
use k256::ecdsa::{SigningKey as Secp256k1PrivKey, VerifyingKey as Secp256k1PubKey};
use quill_types::SigningScheme;

/// All supported public key types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    Secp256k1(Secp256k1PubKey),
    Ed25519(Ed25519PubKey),
}

/// All supported private key types.
#[derive(Clone, Debug)]
pub enum PrivateKey {
    Secp256k1(Secp256k1PrivKey),
    Ed25519(Ed25519PrivKey),
}

impl PublicKey {
    /// Parse a public key from its wire encoding for the given scheme.
    ///
    /// ETH keys are accepted as hex (with or without a `0x` prefix) or
    /// base64, compressed or uncompressed. TON keys are 32 raw bytes in
    /// base64 or hex.
    pub fn parse(encoded: &str, scheme: SigningScheme) -> Result<Self, CryptoError> {
        let bytes = decode_hex_or_base64(encoded)?;
        match scheme {
            SigningScheme::Eth => {
                let key = Secp256k1PubKey::from_sec1_bytes(&bytes).map_err(|e| {
                    CryptoError::InvalidPublicKey(format!("bad secp256k1 key: {e}"))
                })?;
                Ok(PublicKey::Secp256k1(key))
            }
            SigningScheme::Ton => {
                let raw: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                    CryptoError::InvalidPublicKey(format!(
                        "expected 32-byte ed25519 key, got {} bytes",
                        bytes.len()
                    ))
                })?;
                let key = Ed25519PubKey::from_bytes(&raw)
                    .map_err(|e| CryptoError::InvalidPublicKey(format!("bad ed25519 key: {e}")))?;
                Ok(PublicKey::Ed25519(key))
            }
        }
    }

    pub fn scheme(&self) -> SigningScheme {
        match self {
            PublicKey::Secp256k1(_) => SigningScheme::Eth,
            PublicKey::Ed25519(_) => SigningScheme::Ton,
        }
    }

    /// Derive the scheme-appropriate signing address.
    pub fn address(&self) -> String {
        match self {
            PublicKey::Secp256k1(key) => address::eth_address(key),
            PublicKey::Ed25519(key) => address::ton_address(key.as_bytes()),
        }
    }

    /// Canonical stored form: non-compact hex for ETH, base64 for TON.
    pub fn to_stored_string(&self) -> String {
        match self {
            PublicKey::Secp256k1(key) => hex::encode(key.to_encoded_point(false).as_bytes()),
            PublicKey::Ed25519(key) => general_purpose::STANDARD.encode(key.as_bytes()),
        }
    }

    /// Uncompressed SEC1 hex. Only meaningful for ETH keys; TON keys render
    /// as plain hex of the raw bytes.
    pub fn to_non_compact_hex(&self) -> String {
        match self {
            PublicKey::Secp256k1(key) => hex::encode(key.to_encoded_point(false).as_bytes()),
            PublicKey::Ed25519(key) => hex::encode(key.as_bytes()),
        }
    }

    /// Compact base64 form used for storage/lookup symmetry of recovered
    /// ETH keys (compressed SEC1 point).
    pub fn to_compact_base64(&self) -> String {
        match self {
            PublicKey::Secp256k1(key) => {
                general_purpose::STANDARD.encode(key.to_encoded_point(true).as_bytes())
            }
            PublicKey::Ed25519(key) => general_purpose::STANDARD.encode(key.as_bytes()),
        }
    }
}

impl PrivateKey {
    /// Get the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Secp256k1(key) => PublicKey::Secp256k1(*key.verifying_key()),
            PrivateKey::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
        }
    }

    pub fn scheme(&self) -> SigningScheme {
        match self {
            PrivateKey::Secp256k1(_) => SigningScheme::Eth,
            PrivateKey::Ed25519(_) => SigningScheme::Ton,
        }
    }
}

/// Canonicalize an ETH public key in any accepted encoding to non-compact
/// (uncompressed SEC1) hex without a `0x` prefix.
pub fn normalize_eth_public_key(encoded: &str) -> Result<String, CryptoError> {
    Ok(PublicKey::parse(encoded, SigningScheme::Eth)?.to_non_compact_hex())
}

fn decode_hex_or_base64(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    let stripped = encoded.strip_prefix("0x").unwrap_or(encoded);
    if let Ok(bytes) = hex::decode(stripped) {
        return Ok(bytes);
    }
    general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| CryptoError::InvalidPublicKey(format!("not hex or base64: {encoded:?}")))
}
