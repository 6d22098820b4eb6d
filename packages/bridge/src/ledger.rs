//! Release ledger
//!
//! Append-only record of released root-chain transaction IDs. An ID moves from
//! unseen to processed exactly once and never back.
//!
//! A release claims its ID before paying out. While the [`ReleaseClaim`] is
//! alive no other caller can claim or mark the same ID, whichever coordinator
//! it goes through. The claim either commits a record or, when dropped,
//! returns the ID to unseen.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::error::BridgeError;
use crate::state::ReleaseRecord;

#[derive(Debug, Default)]
struct Entries {
    records: HashMap<String, ReleaseRecord>,
    /// Claimed by an in-flight release, not yet committed
    pending: HashSet<String>,
}

impl Entries {
    fn is_taken(&self, root_txn_id: &str) -> bool {
        self.records.contains_key(root_txn_id) || self.pending.contains(root_txn_id)
    }

    fn insert(&mut self, root_txn_id: String, mut record: ReleaseRecord) -> u64 {
        let sequence = self.records.len() as u64;
        record.sequence = sequence;
        self.records.insert(root_txn_id, record);
        sequence
    }
}

#[derive(Debug, Default)]
pub struct ReleaseLedger {
    entries: RwLock<Entries>,
}

impl ReleaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a release for `root_txn_id` has been committed. IDs held by an
    /// in-flight claim are not processed yet.
    pub fn is_processed(&self, root_txn_id: &str) -> bool {
        self.entries.read().records.contains_key(root_txn_id)
    }

    /// Reserve `root_txn_id` for a release in progress.
    ///
    /// Fails with `AlreadyProcessed` when the ID is committed or claimed by
    /// someone else.
    pub fn claim(&self, root_txn_id: &str) -> Result<ReleaseClaim<'_>, BridgeError> {
        let mut entries = self.entries.write();
        if entries.is_taken(root_txn_id) {
            return Err(BridgeError::AlreadyProcessed {
                root_txn_id: root_txn_id.to_string(),
            });
        }
        entries.pending.insert(root_txn_id.to_string());
        Ok(ReleaseClaim {
            ledger: self,
            root_txn_id: root_txn_id.to_string(),
            committed: false,
        })
    }

    /// Record `root_txn_id` as released in one step.
    ///
    /// The record's `sequence` is assigned here. A second mark for the same ID,
    /// or a mark for a claimed ID, fails with `AlreadyProcessed` and leaves the
    /// ledger as it was.
    pub fn mark_processed(
        &self,
        root_txn_id: &str,
        record: ReleaseRecord,
    ) -> Result<u64, BridgeError> {
        let mut entries = self.entries.write();
        if entries.is_taken(root_txn_id) {
            return Err(BridgeError::AlreadyProcessed {
                root_txn_id: root_txn_id.to_string(),
            });
        }
        Ok(entries.insert(root_txn_id.to_string(), record))
    }

    pub fn record(&self, root_txn_id: &str) -> Option<ReleaseRecord> {
        self.entries.read().records.get(root_txn_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().records.is_empty()
    }
}

/// Exclusive hold on a root transaction ID between the ledger check and the
/// payout. Dropping it without [`commit`](ReleaseClaim::commit) releases the ID.
#[derive(Debug)]
pub struct ReleaseClaim<'a> {
    ledger: &'a ReleaseLedger,
    root_txn_id: String,
    committed: bool,
}

impl ReleaseClaim<'_> {
    pub fn root_txn_id(&self) -> &str {
        &self.root_txn_id
    }

    /// Turn the claim into a processed record and return its sequence number.
    pub fn commit(mut self, record: ReleaseRecord) -> u64 {
        let mut entries = self.ledger.entries.write();
        entries.pending.remove(&self.root_txn_id);
        let sequence = entries.insert(self.root_txn_id.clone(), record);
        self.committed = true;
        sequence
    }
}

impl Drop for ReleaseClaim<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.ledger.entries.write().pending.remove(&self.root_txn_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};

    fn record(amount: u64) -> ReleaseRecord {
        ReleaseRecord {
            sequence: 99,
            token: Address::repeat_byte(1),
            recipient: Address::repeat_byte(2),
            root_chain_id: 1,
            destination_chain_id: 0,
            amount: U256::from(amount),
            signers: vec![],
        }
    }

    #[test]
    fn test_mark_assigns_sequence() {
        let ledger = ReleaseLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.mark_processed("tx1", record(1)).unwrap(), 0);
        assert_eq!(ledger.mark_processed("tx2", record(2)).unwrap(), 1);
        assert_eq!(ledger.record("tx2").unwrap().sequence, 1);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_second_mark_keeps_first_record() {
        let ledger = ReleaseLedger::new();
        ledger.mark_processed("tx1", record(1)).unwrap();

        let err = ledger.mark_processed("tx1", record(500)).unwrap_err();
        assert_eq!(
            err,
            BridgeError::AlreadyProcessed {
                root_txn_id: "tx1".to_string()
            }
        );
        assert_eq!(ledger.record("tx1").unwrap().amount, U256::from(1u64));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_unknown_id() {
        let ledger = ReleaseLedger::new();
        assert!(!ledger.is_processed("missing"));
        assert!(ledger.record("missing").is_none());
    }

    #[test]
    fn test_claim_is_exclusive_until_committed() {
        let ledger = ReleaseLedger::new();
        let claim = ledger.claim("tx1").unwrap();
        assert_eq!(claim.root_txn_id(), "tx1");

        assert_eq!(ledger.claim("tx1").unwrap_err().kind(), "already_processed");
        assert_eq!(
            ledger.mark_processed("tx1", record(1)).unwrap_err().kind(),
            "already_processed"
        );
        assert!(!ledger.is_processed("tx1"));

        assert_eq!(claim.commit(record(3)), 0);
        assert!(ledger.is_processed("tx1"));
        assert_eq!(ledger.record("tx1").unwrap().amount, U256::from(3u64));
        assert_eq!(ledger.claim("tx1").unwrap_err().kind(), "already_processed");
    }

    #[test]
    fn test_dropped_claim_frees_the_id() {
        let ledger = ReleaseLedger::new();
        drop(ledger.claim("tx1").unwrap());

        assert!(!ledger.is_processed("tx1"));
        assert!(ledger.is_empty());
        let claim = ledger.claim("tx1").unwrap();
        assert_eq!(claim.commit(record(1)), 0);
    }
}
