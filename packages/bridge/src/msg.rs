//! Message types for the Soldier Bridge
//!
//! Execute and query messages for the JSON entry points on
//! [`BridgeCoordinator`](crate::coordinator::BridgeCoordinator), plus their
//! responses.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::state::ReleaseRecord;

// ============================================================================
// Execute Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ExecuteMsg {
    // ========================================================================
    // Transfers
    // ========================================================================
    /// Escrow `amount` of `token` from the caller for release on another chain.
    /// The caller must have approved the bridge address beforehand.
    LockTokens {
        /// Recipient on the destination chain, in that chain's address format
        to_addr: String,
        destination_chain_id: u32,
        token: Address,
        amount: U256,
    },

    /// Release escrowed tokens for a lock made on `root_chain_id`
    ReleaseTokens {
        token: Address,
        to_addr: Address,
        root_chain_id: u32,
        destination_chain_id: u32,
        /// Lock transaction on the root chain
        root_txn_id: String,
        amount: U256,
        /// 65-byte soldier signatures over the release digest
        signatures: Vec<Bytes>,
    },

    // ========================================================================
    // Governance
    // ========================================================================
    AddValidator {
        validator: Address,
        nonce: u64,
        signatures: Vec<Bytes>,
    },
    RemoveValidator {
        validator: Address,
        nonce: u64,
        signatures: Vec<Bytes>,
    },
    AddToken {
        token: Address,
        nonce: u64,
        signatures: Vec<Bytes>,
    },
    RemoveToken {
        token: Address,
        nonce: u64,
        signatures: Vec<Bytes>,
    },
}

impl ExecuteMsg {
    /// Method name reported in the response
    pub fn method(&self) -> &'static str {
        match self {
            ExecuteMsg::LockTokens { .. } => "lock_tokens",
            ExecuteMsg::ReleaseTokens { .. } => "release_tokens",
            ExecuteMsg::AddValidator { .. } => "add_validator",
            ExecuteMsg::RemoveValidator { .. } => "remove_validator",
            ExecuteMsg::AddToken { .. } => "add_token",
            ExecuteMsg::RemoveToken { .. } => "remove_token",
        }
    }
}

/// Attributes describing a successful execute call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub attributes: Vec<(String, String)>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    /// First value recorded under `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Query Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum QueryMsg {
    /// Returns ConfigResponse
    Config {},
    /// Returns NonceResponse
    Nonce {},
    /// Returns IsValidatorResponse
    IsValidator { address: Address },
    /// Returns ValidatorsResponse
    Validators {},
    /// Returns IsTokenValidResponse
    IsTokenValid { token: Address },
    /// Returns TokensResponse
    Tokens {},
    /// Returns IsProcessedResponse
    IsProcessed { root_txn_id: String },
    /// Returns ReleaseResponse
    Release { root_txn_id: String },
    /// Returns StatsResponse
    Stats {},
    /// Digest soldiers sign for a release. Returns DigestResponse
    ReleaseDigest {
        token: Address,
        to_addr: Address,
        root_chain_id: u32,
        destination_chain_id: u32,
        root_txn_id: String,
        amount: U256,
    },
    /// Digest soldiers sign for a governance action. Returns DigestResponse
    GovernanceDigest { target: Address, nonce: u64 },
}

// ============================================================================
// Query Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub name: String,
    pub version: String,
    pub network_id: u32,
    pub bridge_address: Address,
    pub quorum_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsValidatorResponse {
    pub address: Address,
    pub is_validator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorsResponse {
    pub validators: Vec<Address>,
    pub threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsTokenValidResponse {
    pub token: Address,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensResponse {
    pub tokens: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsProcessedResponse {
    pub root_txn_id: String,
    pub processed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseResponse {
    pub root_txn_id: String,
    pub record: Option<ReleaseRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_locks: u64,
    pub total_releases: u64,
    pub total_governance_actions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestResponse {
    /// Digest soldiers sign
    pub digest: B256,
    /// EIP-191 hash the signatures actually commit to
    pub signing_hash: B256,
}
