//! Cryptographic primitives for the quill contract platform.
//!
//! This crate provides the signing-scheme-polymorphic key types, the
//! deterministic canonical signing payload, signature creation and
//! verification for the ETH (secp256k1, recoverable) and TON (ed25519)
//! schemes, and address derivation for both, using well-audited
//! implementations from the RustCrypto project.

pub mod address;
pub mod canonical;
pub mod keys;
pub mod signature;

pub use address::{eth_address, eth_address_from_hex, normalize_eth_address, ton_address};
pub use canonical::signing_payload;
pub use keys::{normalize_eth_public_key, PrivateKey, PublicKey};
pub use signature::{
    recover_eth, sign_eth, sign_eth_der, sign_ton, verify_eth, verify_signature, verify_ton,
    CryptoError,
};
