//! State definitions for the Soldier Bridge
//!
//! Records kept by the release ledger and counters reported by the `Stats`
//! query. The live registries are in [`crate::registry`].

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Crate name reported by the `Config` query
pub const BRIDGE_NAME: &str = "soldier-bridge";

/// Crate version reported by the `Config` query
pub const BRIDGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Signatures required when no threshold is configured
pub const DEFAULT_QUORUM_THRESHOLD: usize = 3;

/// Raw ECDSA signature length: r (32) || s (32) || v (1)
pub const SIGNATURE_LENGTH: usize = 65;

/// Longest root-chain transaction ID accepted for a release, in bytes
pub const MAX_ROOT_TXN_ID_LEN: usize = 256;

// ============================================================================
// Release Records
// ============================================================================

/// A processed release, keyed by its root-chain transaction ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Position in the order releases were processed (0-based)
    pub sequence: u64,
    /// Token released from escrow
    pub token: Address,
    /// Recipient on this chain
    pub recipient: Address,
    /// Chain the tokens were locked on
    pub root_chain_id: u32,
    /// Chain the release was executed on
    pub destination_chain_id: u32,
    /// Amount released
    pub amount: U256,
    /// Soldiers whose signatures authorized the release, in submission order
    pub signers: Vec<Address>,
}

// ============================================================================
// Statistics
// ============================================================================

/// Bridge statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Total number of successful locks
    pub total_locks: u64,
    /// Total number of successful releases
    pub total_releases: u64,
    /// Total number of applied governance actions (equals the current nonce)
    pub total_governance_actions: u64,
}
