//! Address derivation for the ETH and TON signing schemes.

use crate::signature::CryptoError;
use base64::{engine::general_purpose, Engine as _};
use k256::ecdsa::VerifyingKey as Secp256k1PubKey;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// Derive the Ethereum address of a secp256k1 public key: the last 20 bytes
/// of `keccak256` over the uncompressed point without its `0x04` tag,
/// lowercased and `0x`-prefixed.
pub fn eth_address(public_key: &Secp256k1PubKey) -> String {
    let point = public_key.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Derive an Ethereum address from a public key in any accepted encoding.
pub fn eth_address_from_hex(encoded: &str) -> Result<String, CryptoError> {
    use crate::keys::PublicKey;
    match PublicKey::parse(encoded, quill_types::SigningScheme::Eth)? {
        PublicKey::Secp256k1(key) => Ok(eth_address(&key)),
        PublicKey::Ed25519(_) => unreachable!("parsed as ETH"),
    }
}

/// Normalize an externally supplied Ethereum address to the canonical
/// `0x`-prefixed lowercase form. Accepts a leading `eth|` alias prefix, a
/// `0x` prefix, and mixed (checksum) casing.
pub fn normalize_eth_address(address: &str) -> Result<String, CryptoError> {
    let stripped = address.strip_prefix("eth|").unwrap_or(address);
    let stripped = stripped.strip_prefix("0x").unwrap_or(stripped);
    if stripped.len() != 40 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CryptoError::InvalidAddress(format!(
            "expected 20-byte hex address, got {address:?}"
        )));
    }
    Ok(format!("0x{}", stripped.to_lowercase()))
}

/// Tag byte of a bounceable user-friendly TON address.
const TON_BOUNCEABLE_TAG: u8 = 0x11;

/// Basechain workchain id.
const TON_BASECHAIN: u8 = 0x00;

/// Derive the bounceable TON address of a raw ed25519 public key.
///
/// User-friendly format: 36 bytes as base64url — tag, workchain, 32-byte
/// account id (here the SHA-256 of the raw key), CRC16/XMODEM checksum.
pub fn ton_address(public_key: &[u8; 32]) -> String {
    let account_id = Sha256::digest(public_key);

    let mut bytes = [0u8; 36];
    bytes[0] = TON_BOUNCEABLE_TAG;
    bytes[1] = TON_BASECHAIN;
    bytes[2..34].copy_from_slice(&account_id);
    let crc = crc16_xmodem(&bytes[..34]);
    bytes[34..].copy_from_slice(&crc.to_be_bytes());

    general_purpose::URL_SAFE.encode(bytes)
}

// CRC16/XMODEM (poly 0x1021, init 0), the checksum TON's user-friendly
// address format specifies.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
