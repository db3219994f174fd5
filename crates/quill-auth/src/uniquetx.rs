//! Store-backed replay guard.
//!
//! Every signed SUBMIT-class envelope carries a `uniqueKey` that is part of
//! the signed payload, so each signature commits to a single replay-distinct
//! message. Consuming a key records it in the `UNTX` namespace; a second
//! consumption in any later transaction is rejected.

use quill_store::{composite_key, LedgerStub, UNIQUE_TX_NAMESPACE};
use quill_types::ChainError;

/// Record a unique key as used, failing if it has been consumed before.
pub fn consume_unique_key(stub: &mut dyn LedgerStub, unique_key: &str) -> Result<(), ChainError> {
    let key = composite_key(UNIQUE_TX_NAMESPACE, &[unique_key]);
    if stub.get_state(&key)?.is_some() {
        return Err(ChainError::validation(format!(
            "unique key {unique_key:?} has already been used"
        )));
    }
    let tx_id = stub.get_tx_id();
    stub.put_state(&key, tx_id.into_bytes())?;
    Ok(())
}
