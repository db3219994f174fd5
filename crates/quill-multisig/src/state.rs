//! Persisted multisig wallet state.

use quill_store::{composite_key, LedgerStub, MULTISIG_NAMESPACE};
use quill_types::ChainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A submitted transaction awaiting confirmations.
///
/// `confirmations` holds distinct owner addresses in confirmation order and
/// is always strictly shorter than the wallet's threshold while persisted;
/// reaching the threshold removes the entry in the same transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTx {
    pub to: String,
    pub data: String,
    pub confirmations: Vec<String>,
}

/// Wallet state, keyed by wallet id under the `MSIG` namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigState {
    pub wallet_id: String,
    /// Owner addresses, non-empty, in registration order.
    pub owners: Vec<String>,
    /// Confirmations required to execute, in `1..=owners.len()`.
    pub threshold: u32,
    /// Next submission nonce; increases monotonically.
    pub nonce: u64,
    #[serde(default)]
    pub pending_txs: BTreeMap<u64, PendingTx>,
}

impl MultisigState {
    pub fn new(wallet_id: String, owners: Vec<String>, threshold: u32) -> Self {
        Self {
            wallet_id,
            owners,
            threshold,
            nonce: 0,
            pending_txs: BTreeMap::new(),
        }
    }

    pub fn storage_key(wallet_id: &str) -> String {
        composite_key(MULTISIG_NAMESPACE, &[wallet_id])
    }

    pub fn is_owner(&self, address: &str) -> bool {
        self.owners.iter().any(|owner| owner == address)
    }

    /// Load a wallet, returning `None` when it does not exist.
    pub fn load(stub: &dyn LedgerStub, wallet_id: &str) -> Result<Option<Self>, ChainError> {
        match stub.get_state(&Self::storage_key(wallet_id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, stub: &mut dyn LedgerStub) -> Result<(), ChainError> {
        let bytes = serde_json::to_vec(self)?;
        stub.put_state(&Self::storage_key(&self.wallet_id), bytes)?;
        Ok(())
    }
}
