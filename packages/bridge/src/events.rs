//! Bridge notifications
//!
//! Every successful operation emits exactly one [`BridgeEvent`] to the
//! configured [`EventSink`], synchronously and before the operation returns.
//! Failed operations emit nothing.

use alloy::primitives::{Address, U256};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BridgeEvent {
    /// Tokens escrowed here for release on `destination_chain_id`
    Lock {
        from_addr: Address,
        /// Recipient on the destination chain, in that chain's address format
        to_addr: String,
        root_chain_id: u32,
        destination_chain_id: u32,
        token_addr: Address,
        amount: U256,
    },
    /// Escrowed tokens released for a lock on `root_chain_id`
    BridgeSuccess {
        token_addr: Address,
        to_addr: Address,
        root_chain_id: u32,
        destination_chain_id: u32,
        root_txn_id: String,
        amount: U256,
    },
    TokenAdded {
        token_address: Address,
    },
    TokenRemoved {
        token_address: Address,
    },
    ValidatorAdded {
        validator_address: Address,
    },
    ValidatorRemoved {
        validator_address: Address,
    },
}

impl BridgeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BridgeEvent::Lock { .. } => "lock",
            BridgeEvent::BridgeSuccess { .. } => "bridge_success",
            BridgeEvent::TokenAdded { .. } => "token_added",
            BridgeEvent::TokenRemoved { .. } => "token_removed",
            BridgeEvent::ValidatorAdded { .. } => "validator_added",
            BridgeEvent::ValidatorRemoved { .. } => "validator_removed",
        }
    }
}

/// Receives bridge notifications
///
/// Events are delivered after the registry lock is released, so `emit` may
/// read [`BridgeState`](crate::registry::BridgeState) back. Governance events
/// are delivered in nonce order; a sink must not submit governance actions of
/// its own from inside `emit`.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BridgeEvent);
}

/// In-memory sink that keeps every event in emission order
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<BridgeEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.events.lock().clone()
    }

    /// Take all events emitted so far, leaving the log empty
    pub fn drain(&self) -> Vec<BridgeEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: BridgeEvent) {
        self.events.lock().push(event);
    }
}

/// Sink that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: BridgeEvent) {
        match &event {
            BridgeEvent::Lock {
                from_addr,
                to_addr,
                destination_chain_id,
                token_addr,
                amount,
                ..
            } => info!(
                event = event.name(),
                from = %from_addr,
                to = %to_addr,
                dest_chain = destination_chain_id,
                token = %token_addr,
                amount = %amount,
                "Bridge event"
            ),
            BridgeEvent::BridgeSuccess {
                token_addr,
                to_addr,
                root_chain_id,
                root_txn_id,
                amount,
                ..
            } => info!(
                event = event.name(),
                to = %to_addr,
                root_chain = root_chain_id,
                root_txn_id = %root_txn_id,
                token = %token_addr,
                amount = %amount,
                "Bridge event"
            ),
            BridgeEvent::TokenAdded { token_address }
            | BridgeEvent::TokenRemoved { token_address } => {
                info!(event = event.name(), token = %token_address, "Bridge event")
            }
            BridgeEvent::ValidatorAdded { validator_address }
            | BridgeEvent::ValidatorRemoved { validator_address } => {
                info!(event = event.name(), soldier = %validator_address, "Bridge event")
            }
        }
    }
}
