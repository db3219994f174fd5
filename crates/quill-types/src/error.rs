//! Error taxonomy for authentication, authorization and wallet operations.
//!
//! Every failure is one of the tagged kinds below. Callers dispatch on the
//! stable identifier returned by [`ChainError::key`] rather than on message
//! text. Errors raised inside the authenticator's per-signature loop carry a
//! `(signer: <id>)` suffix identifying the offending entry, where `<id>` is
//! the declared signer address, the declared public key, or the entry index.

use thiserror::Error;

/// Top-level error enum that can cross module boundaries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("envelope carries no signatures and no service| sender")]
    MissingSignature,

    #[error("signature entry has no signer address or public key and is not recoverable (signer: {signer})")]
    MissingSigner { signature: String, signer: String },

    #[error("recovered public key {recovered} does not match provided key {provided} (signer: {signer})")]
    PublicKeyMismatch {
        recovered: String,
        provided: String,
        signer: String,
    },

    #[error("recovered address {recovered} does not match provided address {provided} (signer: {signer})")]
    AddressMismatch {
        recovered: String,
        provided: String,
        signer: String,
    },

    #[error("signer public key {provided} is redundant with recoverable signature (signer: {signer})")]
    RedundantSignerPublicKey {
        recovered: String,
        provided: String,
        signer: String,
    },

    #[error("signer address {provided} is redundant with recoverable signature (signer: {signer})")]
    RedundantSignerAddress {
        recovered: String,
        provided: String,
        signer: String,
    },

    #[error("duplicate signer in envelope (signer: {address})")]
    DuplicateSigner { address: String },

    #[error("signature verification failed for {alias} (signer: {signer})")]
    PkInvalidSignature { alias: String, signer: String },

    #[error("no public key registered for {alias} (signer: {signer})")]
    PkMissing { alias: String, signer: String },

    #[error("user {user_id} is not registered (signer: {signer})")]
    UserNotRegistered { user_id: String, signer: String },

    #[error("chaincode authorization failed: {message}")]
    ChaincodeAuthorization { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("requires at least {required} signatures but got {received}")]
    Forbidden { required: usize, received: usize },

    #[error("user {alias} has roles {has:?} but the operation requires {required:?}")]
    MissingRole {
        alias: String,
        has: Vec<String>,
        required: Vec<String>,
    },

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: String },

    #[error("validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("store error: {message}")]
    Store { message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ChainError {
    /// Stable identifier for caller dispatch.
    pub fn key(&self) -> &'static str {
        match self {
            ChainError::MissingSignature => "MISSING_SIGNATURE",
            ChainError::MissingSigner { .. } => "MISSING_SIGNER",
            ChainError::PublicKeyMismatch { .. } => "PK_MISMATCH",
            ChainError::AddressMismatch { .. } => "ADDRESS_MISMATCH",
            ChainError::RedundantSignerPublicKey { .. } => "REDUNDANT_SIGNER_PUBLIC_KEY",
            ChainError::RedundantSignerAddress { .. } => "REDUNDANT_SIGNER_ADDRESS",
            ChainError::DuplicateSigner { .. } => "DUPLICATE_SIGNER",
            ChainError::PkInvalidSignature { .. } => "PK_INVALID_SIGNATURE",
            ChainError::PkMissing { .. } => "PK_MISSING",
            ChainError::UserNotRegistered { .. } => "USER_NOT_REGISTERED",
            ChainError::ChaincodeAuthorization { .. } => "CHAINCODE_AUTHORIZATION",
            ChainError::Unauthorized { .. } => "UNAUTHORIZED",
            ChainError::Forbidden { .. } => "FORBIDDEN",
            ChainError::MissingRole { .. } => "MISSING_ROLE",
            ChainError::NotFound { .. } => "NOT_FOUND",
            ChainError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ChainError::Store { .. } => "STORE_ERROR",
            ChainError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }

    /// Shorthand for a [`ChainError::ValidationFailed`].
    pub fn validation(message: impl Into<String>) -> Self {
        ChainError::ValidationFailed {
            message: message.into(),
        }
    }

    /// Shorthand for a [`ChainError::NotFound`].
    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        ChainError::NotFound {
            what,
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable() {
        assert_eq!(ChainError::MissingSignature.key(), "MISSING_SIGNATURE");
        assert_eq!(
            ChainError::Forbidden {
                required: 2,
                received: 1
            }
            .key(),
            "FORBIDDEN"
        );
    }

    #[test]
    fn signer_annotation_appears_in_message() {
        let err = ChainError::PkInvalidSignature {
            alias: "client|u2".to_string(),
            signer: "0xdead".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("client|u2"));
        assert!(message.ends_with("(signer: 0xdead)"));
    }

    #[test]
    fn forbidden_carries_counts() {
        let err = ChainError::Forbidden {
            required: 3,
            received: 1,
        };
        assert_eq!(err.to_string(), "requires at least 3 signatures but got 1");
    }
}
