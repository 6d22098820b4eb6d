//! Soldier Bridge - Threshold-Signed Cross-Chain Token Bridging
//!
//! A fixed-threshold set of soldiers (validators) jointly authorizes every
//! state change of a bridge instance by signing digests off-chain.
//!
//! # Outgoing Flow (Lock)
//! 1. User approves the bridge address and calls `lock_tokens`
//! 2. Tokens move into escrow and a `Lock` event is emitted
//! 3. Soldiers observe the event and sign a release for the destination chain
//!
//! # Incoming Flow (Release)
//! 1. A relayer collects soldier signatures over the release digest
//! 2. `release_tokens` verifies the quorum and pays out of escrow
//! 3. The root transaction ID is recorded and can never be released again
//!
//! # Governance
//! Soldiers and bridgeable tokens are added or removed by a soldier holding a
//! quorum of signatures over `(target, nonce)`. One nonce is shared by all
//! governance actions and advances by one per applied action.
//!
//! # Security
//! - Duplicate and outsider signatures are rejected before counting
//! - Nonce sequencing prevents governance replay
//! - The release ledger prevents double release
//! - The soldier set never shrinks below the threshold

pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod ledger;
pub mod msg;
mod query;
pub mod registry;
pub mod signature;
pub mod state;
pub mod token;

pub use crate::config::BridgeConfig;
pub use crate::coordinator::BridgeCoordinator;
pub use crate::error::BridgeError;
pub use crate::events::{BridgeEvent, EventLog, EventSink, TracingSink};
pub use crate::ledger::{ReleaseClaim, ReleaseLedger};
pub use crate::registry::{BridgeState, RegistryKind, RegistryState};
pub use crate::signature::{recover, verify_quorum};
pub use crate::state::{ReleaseRecord, Stats, DEFAULT_QUORUM_THRESHOLD, MAX_ROOT_TXN_ID_LEN};
pub use crate::token::{MemoryTokenLedger, TokenCapability};
