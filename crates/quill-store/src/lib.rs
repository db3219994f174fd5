//! Ledger stub abstraction for the quill contract platform.
//!
//! The authenticator and the wallet state machine target the [`LedgerStub`]
//! trait rather than a concrete ledger. Production wires the peer's
//! transaction stub; tests substitute the in-memory [`MemStub`], which
//! buffers writes and events until an explicit commit the way the real
//! ledger's write-set does.

pub mod memstub;

use thiserror::Error;

pub use memstub::MemStub;

/// Namespace of stored public key records, keyed by alias.
pub const PK_NAMESPACE: &str = "GCPK";

/// Namespace of user profiles, keyed by signing address.
pub const PROFILE_NAMESPACE: &str = "GCUP";

/// Namespace of multisig wallet state, keyed by wallet id.
pub const MULTISIG_NAMESPACE: &str = "MSIG";

/// Namespace of consumed envelope unique keys (replay guard).
pub const UNIQUE_TX_NAMESPACE: &str = "UNTX";

/// Separator used in composite keys, chosen to never occur in attributes.
const COMPOSITE_KEY_SEPARATOR: char = '\u{0}';

/// Store error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("write attempted on a read-only store view")]
    ReadOnly,

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl From<StoreError> for quill_types::ChainError {
    fn from(err: StoreError) -> Self {
        quill_types::ChainError::Store {
            message: err.to_string(),
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Build a composite key from an object type and its attributes.
pub fn composite_key(object_type: &str, attributes: &[&str]) -> String {
    let mut key = String::with_capacity(object_type.len() + 2);
    key.push(COMPOSITE_KEY_SEPARATOR);
    key.push_str(object_type);
    for attribute in attributes {
        key.push(COMPOSITE_KEY_SEPARATOR);
        key.push_str(attribute);
    }
    key.push(COMPOSITE_KEY_SEPARATOR);
    key
}

/// The chaincode invocation embedded in a peer-signed proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChaincodeInvocationSpec {
    pub chaincode_name: String,
    pub args: Vec<Vec<u8>>,
}

/// Peer-provided signed transaction proposal, the trusted source of the
/// origin-chaincode identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignedProposal {
    pub invocation_spec: ChaincodeInvocationSpec,
}

/// Read/write access to the ledger within a single transaction.
///
/// Reads are deterministic within one transaction; writes buffer and become
/// durable only on successful commit. Events are part of the write set and
/// are observed only on commit.
pub trait LedgerStub {
    /// Get a value by key.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Buffer a key-value write.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Buffer a key deletion.
    fn delete_state(&mut self, key: &str) -> Result<()>;

    /// Attach a named event to the transaction's write set.
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<()>;

    /// Identifier of the enclosing transaction.
    fn get_tx_id(&self) -> String;

    /// The peer-signed proposal, when the request came through a peer.
    fn get_signed_proposal(&self) -> Option<&SignedProposal>;

    /// Whether this view rejects writes (EVALUATE-class operations).
    fn is_read_only(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_keys_are_separator_delimited() {
        let key = composite_key(PK_NAMESPACE, &["client|alice"]);
        assert_eq!(key, "\u{0}GCPK\u{0}client|alice\u{0}");
    }

    #[test]
    fn composite_keys_do_not_collide_across_attribute_splits() {
        let one = composite_key(PROFILE_NAMESPACE, &["ab", "c"]);
        let two = composite_key(PROFILE_NAMESPACE, &["a", "bc"]);
        assert_ne!(one, two);
    }
}
