//! In-memory ledger stub for tests.

use crate::{LedgerStub, Result, SignedProposal, StoreError};
use std::collections::BTreeMap;

/// In-memory [`LedgerStub`] implementation.
///
/// Writes and events accumulate in a pending write set with read-your-writes
/// visibility and are applied to committed state by [`MemStub::commit`],
/// mirroring the ledger's transaction discipline. Events become observable
/// through [`MemStub::committed_events`] only after commit.
pub struct MemStub {
    committed: BTreeMap<String, Vec<u8>>,
    // Pending write set; `None` marks a buffered deletion.
    pending: BTreeMap<String, Option<Vec<u8>>>,
    pending_events: Vec<(String, Vec<u8>)>,
    committed_events: Vec<(String, Vec<u8>)>,
    tx_id: String,
    signed_proposal: Option<SignedProposal>,
    read_only: bool,
}

impl MemStub {
    pub fn new() -> Self {
        Self {
            committed: BTreeMap::new(),
            pending: BTreeMap::new(),
            pending_events: Vec::new(),
            committed_events: Vec::new(),
            tx_id: "tx-0".to_string(),
            signed_proposal: None,
            read_only: false,
        }
    }

    /// Begin a new transaction with the given id, discarding any
    /// uncommitted writes of the previous one.
    pub fn begin_tx(&mut self, tx_id: impl Into<String>) {
        self.pending.clear();
        self.pending_events.clear();
        self.tx_id = tx_id.into();
    }

    /// Apply the pending write set and publish pending events.
    pub fn commit(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for (key, value) in pending {
            match value {
                Some(value) => {
                    self.committed.insert(key, value);
                }
                None => {
                    self.committed.remove(&key);
                }
            }
        }
        self.committed_events.append(&mut self.pending_events);
    }

    /// Drop the pending write set without applying it.
    pub fn rollback(&mut self) {
        self.pending.clear();
        self.pending_events.clear();
    }

    /// Events published by committed transactions, in emission order.
    pub fn committed_events(&self) -> &[(String, Vec<u8>)] {
        &self.committed_events
    }

    pub fn set_signed_proposal(&mut self, proposal: Option<SignedProposal>) {
        self.signed_proposal = proposal;
    }

    /// Toggle the read-only view used by EVALUATE-class operations.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl Default for MemStub {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStub for MemStub {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(pending) = self.pending.get(key) {
            return Ok(pending.clone());
        }
        Ok(self.committed.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        if key.is_empty() {
            return Err(StoreError::InvalidKey("empty key".to_string()));
        }
        self.pending.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete_state(&mut self, key: &str) -> Result<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.pending.insert(key.to_string(), None);
        Ok(())
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.pending_events.push((name.to_string(), payload));
        Ok(())
    }

    fn get_tx_id(&self) -> String {
        self.tx_id.clone()
    }

    fn get_signed_proposal(&self) -> Option<&SignedProposal> {
        self.signed_proposal.as_ref()
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_see_pending_writes() {
        let mut stub = MemStub::new();
        stub.put_state("k", b"v1".to_vec()).unwrap();
        assert_eq!(stub.get_state("k").unwrap(), Some(b"v1".to_vec()));
    }

    #[test]
    fn rollback_discards_pending_writes_and_events() {
        let mut stub = MemStub::new();
        stub.put_state("k", b"v1".to_vec()).unwrap();
        stub.set_event("Ev", b"{}".to_vec()).unwrap();
        stub.rollback();

        assert_eq!(stub.get_state("k").unwrap(), None);
        assert!(stub.committed_events().is_empty());
    }

    #[test]
    fn events_are_observable_only_after_commit() {
        let mut stub = MemStub::new();
        stub.set_event("Ev", b"{}".to_vec()).unwrap();
        assert!(stub.committed_events().is_empty());

        stub.commit();
        assert_eq!(stub.committed_events().len(), 1);
        assert_eq!(stub.committed_events()[0].0, "Ev");
    }

    #[test]
    fn pending_deletion_shadows_committed_value() {
        let mut stub = MemStub::new();
        stub.put_state("k", b"v1".to_vec()).unwrap();
        stub.commit();

        stub.delete_state("k").unwrap();
        assert_eq!(stub.get_state("k").unwrap(), None);
        stub.commit();
        assert_eq!(stub.get_state("k").unwrap(), None);
    }

    #[test]
    fn read_only_view_rejects_writes() {
        let mut stub = MemStub::new();
        stub.set_read_only(true);
        assert_eq!(
            stub.put_state("k", b"v".to_vec()),
            Err(StoreError::ReadOnly)
        );
        assert_eq!(stub.set_event("Ev", vec![]), Err(StoreError::ReadOnly));
    }
}
