//! Core types for the quill contract platform.
//!
//! This crate defines the on-ledger identity model (aliases, roles, user
//! profiles, stored public keys) and the error taxonomy shared by the
//! authenticator, the authorization gate and the multisig wallet.

pub mod alias;
pub mod error;
pub mod profile;

pub use error::ChainError;
pub use profile::{CallingUser, PublicKeyRecord, SigningScheme, UserProfile};

/// Result type for chain operations
pub type Result<T> = std::result::Result<T, ChainError>;
