//! Error types for the Soldier Bridge
//!
//! Every rejection is local and final: the operation that returned it left no
//! state change behind and emitted no event.

use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::registry::RegistryKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    // ========================================================================
    // Signature Errors
    // ========================================================================

    #[error("Malformed signature: {reason}")]
    MalformedSignature { reason: String },

    #[error("Duplicated signature: {signer} signed more than once")]
    DuplicateSignature { signer: Address },

    #[error("Invalid signature: {signer} is not one of the soldiers")]
    InvalidSignature { signer: Address },

    #[error("Insufficient signatures: got {got}, need {required}")]
    InsufficientSignatures { got: usize, required: usize },

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: caller is not one of the soldiers: {caller}")]
    Unauthorized { caller: Address },

    // ========================================================================
    // Governance Errors
    // ========================================================================

    #[error("Invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("{kind} already active: {address}")]
    AlreadyActive { kind: RegistryKind, address: Address },

    #[error("Zero address cannot be a soldier")]
    ZeroAddress,

    #[error("Not a soldier: {address}")]
    NotAMember { address: Address },

    #[error("Token already not active: {token}")]
    NotActive { token: Address },

    #[error("Not enough soldiers: removal leaves {remaining}, threshold is {threshold}")]
    QuorumTooSmall { remaining: usize, threshold: usize },

    // ========================================================================
    // Transfer Errors
    // ========================================================================

    #[error("Token not supported: {token}")]
    UnknownToken { token: Address },

    #[error("Invalid transaction ID: {reason}")]
    InvalidTxnId { reason: String },

    #[error("Transaction ID already processed: {root_txn_id}")]
    AlreadyProcessed { root_txn_id: String },

    #[error("Token transfer failed: {amount} of {token} from {from} to {to}")]
    TransferFailed {
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    },

    // ========================================================================
    // Construction & Encoding Errors
    // ========================================================================

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl BridgeError {
    /// Stable snake_case tag, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::MalformedSignature { .. } => "malformed_signature",
            BridgeError::DuplicateSignature { .. } => "duplicate_signature",
            BridgeError::InvalidSignature { .. } => "invalid_signature",
            BridgeError::InsufficientSignatures { .. } => "insufficient_signatures",
            BridgeError::Unauthorized { .. } => "unauthorized",
            BridgeError::InvalidNonce { .. } => "invalid_nonce",
            BridgeError::AlreadyActive { .. } => "already_active",
            BridgeError::ZeroAddress => "zero_address",
            BridgeError::NotAMember { .. } => "not_a_member",
            BridgeError::NotActive { .. } => "not_active",
            BridgeError::QuorumTooSmall { .. } => "quorum_too_small",
            BridgeError::UnknownToken { .. } => "unknown_token",
            BridgeError::InvalidTxnId { .. } => "invalid_txn_id",
            BridgeError::AlreadyProcessed { .. } => "already_processed",
            BridgeError::TransferFailed { .. } => "transfer_failed",
            BridgeError::InvalidConfig { .. } => "invalid_config",
            BridgeError::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization {
            reason: err.to_string(),
        }
    }
}
