//! Query handlers for the Soldier Bridge.
//!
//! Read-only; each handler takes read guards only.

use alloy::primitives::{Address, B256, U256};
use bridge_common::{compute_governance_digest, eth_signed_message_hash};

use crate::coordinator::{release_digest, BridgeCoordinator};
use crate::error::BridgeError;
use crate::msg::{
    ConfigResponse, DigestResponse, IsProcessedResponse, IsTokenValidResponse,
    IsValidatorResponse, NonceResponse, ReleaseResponse, StatsResponse, TokensResponse,
    ValidatorsResponse,
};
use crate::state::{BRIDGE_NAME, BRIDGE_VERSION};

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(bridge: &BridgeCoordinator) -> ConfigResponse {
    ConfigResponse {
        name: BRIDGE_NAME.to_string(),
        version: BRIDGE_VERSION.to_string(),
        network_id: bridge.network_id(),
        bridge_address: bridge.bridge_address(),
        quorum_threshold: bridge.state().threshold(),
    }
}

pub fn query_stats(bridge: &BridgeCoordinator) -> StatsResponse {
    let stats = bridge.stats();
    StatsResponse {
        total_locks: stats.total_locks,
        total_releases: stats.total_releases,
        total_governance_actions: stats.total_governance_actions,
    }
}

// ============================================================================
// Registry Queries
// ============================================================================

pub fn query_nonce(bridge: &BridgeCoordinator) -> NonceResponse {
    NonceResponse {
        nonce: bridge.state().current_nonce(),
    }
}

pub fn query_is_validator(bridge: &BridgeCoordinator, address: Address) -> IsValidatorResponse {
    IsValidatorResponse {
        address,
        is_validator: bridge.state().is_validator(&address),
    }
}

pub fn query_validators(bridge: &BridgeCoordinator) -> ValidatorsResponse {
    ValidatorsResponse {
        validators: bridge.state().validators(),
        threshold: bridge.state().threshold(),
    }
}

pub fn query_is_token_valid(bridge: &BridgeCoordinator, token: Address) -> IsTokenValidResponse {
    IsTokenValidResponse {
        token,
        is_valid: bridge.state().is_token_valid(&token),
    }
}

pub fn query_tokens(bridge: &BridgeCoordinator) -> TokensResponse {
    TokensResponse {
        tokens: bridge.state().tokens(),
    }
}

// ============================================================================
// Release Queries
// ============================================================================

pub fn query_is_processed(bridge: &BridgeCoordinator, root_txn_id: String) -> IsProcessedResponse {
    let processed = bridge.ledger().is_processed(&root_txn_id);
    IsProcessedResponse {
        root_txn_id,
        processed,
    }
}

pub fn query_release(bridge: &BridgeCoordinator, root_txn_id: String) -> ReleaseResponse {
    let record = bridge.ledger().record(&root_txn_id);
    ReleaseResponse {
        root_txn_id,
        record,
    }
}

// ============================================================================
// Digest Queries
// ============================================================================

/// Compute the release digest without touching state, so relayers can collect
/// signatures over exactly these bytes. Rejects the same IDs a release would.
pub fn query_release_digest(
    token: Address,
    to_addr: Address,
    root_chain_id: u32,
    destination_chain_id: u32,
    root_txn_id: &str,
    amount: U256,
) -> Result<DigestResponse, BridgeError> {
    let digest = release_digest(
        &to_addr,
        root_chain_id,
        destination_chain_id,
        &token,
        root_txn_id,
        amount,
    )?;
    Ok(digest_response(digest))
}

pub fn query_governance_digest(target: Address, nonce: u64) -> DigestResponse {
    digest_response(compute_governance_digest(&target, nonce))
}

fn digest_response(digest: [u8; 32]) -> DigestResponse {
    DigestResponse {
        digest: B256::from(digest),
        signing_hash: B256::from(eth_signed_message_hash(&digest)),
    }
}
