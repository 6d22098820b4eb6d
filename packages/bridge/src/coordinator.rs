//! Soldier Bridge - Entry Points
//!
//! [`BridgeCoordinator`] escrows tokens on lock and releases them on a quorum of
//! soldier signatures. It also exposes JSON-style `execute`/`query` entry
//! points that dispatch to the handlers in this module, [`crate::registry`]
//! and [`crate::query`].
//!
//! # Release
//! 1. Soldiers observe a lock on the root chain and sign the release digest
//! 2. Anyone submits the signatures with `release_tokens`
//! 3. The bridge verifies the quorum, claims the root transaction in the
//!    ledger, pays out of escrow and commits the claim so the transaction can
//!    never be released again
//!
//! The ledger claim is what makes a release happen at most once, so any number
//! of coordinators may share one [`ReleaseLedger`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use bridge_common::compute_release_digest;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::events::{BridgeEvent, EventSink};
use crate::ledger::ReleaseLedger;
use crate::msg::{ExecuteMsg, QueryMsg, Response};
use crate::query::{
    query_config, query_governance_digest, query_is_processed, query_is_token_valid,
    query_is_validator, query_nonce, query_release, query_release_digest, query_stats,
    query_tokens, query_validators,
};
use crate::registry::BridgeState;
use crate::signature::verify_quorum;
use crate::state::{ReleaseRecord, Stats, MAX_ROOT_TXN_ID_LEN};
use crate::token::TokenCapability;

pub struct BridgeCoordinator {
    network_id: u32,
    state: Arc<BridgeState>,
    ledger: Arc<ReleaseLedger>,
    token: Arc<dyn TokenCapability>,
    events: Arc<dyn EventSink>,
    total_locks: AtomicU64,
}

// ============================================================================
// Construction
// ============================================================================

impl BridgeCoordinator {
    /// Build a coordinator over existing registries and ledger. The escrow
    /// account is the one `token` reports.
    pub fn new(
        network_id: u32,
        state: Arc<BridgeState>,
        ledger: Arc<ReleaseLedger>,
        token: Arc<dyn TokenCapability>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            network_id,
            state,
            ledger,
            token,
            events,
            total_locks: AtomicU64::new(0),
        }
    }

    /// Validate `config` and build a bridge with fresh registries and ledger.
    ///
    /// `config.bridge_address` must be the escrow account `token` operates.
    pub fn instantiate(
        config: &BridgeConfig,
        token: Arc<dyn TokenCapability>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, BridgeError> {
        config.validate()?;

        if config.bridge_address != token.escrow() {
            return Err(BridgeError::InvalidConfig {
                reason: format!(
                    "bridge address {} is not the token escrow {}",
                    config.bridge_address,
                    token.escrow()
                ),
            });
        }

        let state = BridgeState::new(
            config.validators.iter().copied(),
            config.tokens.iter().copied(),
            config.quorum_threshold,
            events.clone(),
        )?;

        info!(
            network_id = config.network_id,
            bridge = %config.bridge_address,
            "Instantiated bridge"
        );

        Ok(Self::new(
            config.network_id,
            Arc::new(state),
            Arc::new(ReleaseLedger::new()),
            token,
            events,
        ))
    }

    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    /// Escrow account holding locked tokens
    pub fn bridge_address(&self) -> Address {
        self.token.escrow()
    }

    pub fn state(&self) -> &Arc<BridgeState> {
        &self.state
    }

    pub fn ledger(&self) -> &Arc<ReleaseLedger> {
        &self.ledger
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_locks: self.total_locks.load(Ordering::SeqCst),
            total_releases: self.ledger.len() as u64,
            total_governance_actions: self.state.current_nonce(),
        }
    }
}

// ============================================================================
// Transfers
// ============================================================================

impl BridgeCoordinator {
    /// Escrow `amount` of `token` from `caller` for release on
    /// `destination_chain_id`. Needs no signatures; the caller must have
    /// approved the bridge address for at least `amount`.
    pub fn lock_tokens(
        &self,
        caller: &Address,
        to_addr: &str,
        destination_chain_id: u32,
        token: Address,
        amount: U256,
    ) -> Result<(), BridgeError> {
        // Token removal waits until the escrow pull is done
        let registry = self.state.read();

        if !registry.tokens().contains(&token) {
            warn!(token = %token, from = %caller, "Lock rejected: token not supported");
            return Err(BridgeError::UnknownToken { token });
        }

        if !self.token.transfer_from(&token, caller, amount) {
            warn!(token = %token, from = %caller, amount = %amount, "Lock rejected: transfer failed");
            return Err(BridgeError::TransferFailed {
                token,
                from: *caller,
                to: self.bridge_address(),
                amount,
            });
        }
        drop(registry);

        self.total_locks.fetch_add(1, Ordering::SeqCst);
        info!(
            token = %token,
            from = %caller,
            to = to_addr,
            dest_chain = destination_chain_id,
            amount = %amount,
            "Tokens locked"
        );
        self.events.emit(BridgeEvent::Lock {
            from_addr: *caller,
            to_addr: to_addr.to_string(),
            root_chain_id: self.network_id,
            destination_chain_id,
            token_addr: token,
            amount,
        });
        Ok(())
    }

    /// Release `amount` of `token` from escrow to `to_addr` for the lock
    /// `root_txn_id` made on `root_chain_id`.
    ///
    /// Each `root_txn_id` is released at most once, whoever signs and whatever
    /// the payload. A failed transfer leaves the ID unprocessed.
    #[allow(clippy::too_many_arguments)]
    pub fn release_tokens<S: AsRef<[u8]>>(
        &self,
        token: Address,
        to_addr: Address,
        root_chain_id: u32,
        destination_chain_id: u32,
        root_txn_id: &str,
        amount: U256,
        signatures: &[S],
    ) -> Result<(), BridgeError> {
        let digest = release_digest(
            &to_addr,
            root_chain_id,
            destination_chain_id,
            &token,
            root_txn_id,
            amount,
        )?;

        let signers = {
            let registry = self.state.read();
            verify_quorum(
                &digest,
                signatures,
                registry.validators(),
                self.state.threshold(),
            )
            .map_err(|err| {
                warn!(root_txn_id, error = err.kind(), "Release rejected");
                err
            })?
        };

        let claim = self.ledger.claim(root_txn_id).map_err(|err| {
            warn!(root_txn_id, "Release rejected: already processed");
            err
        })?;

        if !self.token.transfer(&token, &to_addr, amount) {
            warn!(root_txn_id, token = %token, amount = %amount, "Release rejected: transfer failed");
            return Err(BridgeError::TransferFailed {
                token,
                from: self.bridge_address(),
                to: to_addr,
                amount,
            });
        }

        let sequence = claim.commit(ReleaseRecord {
            sequence: 0,
            token,
            recipient: to_addr,
            root_chain_id,
            destination_chain_id,
            amount,
            signers,
        });

        info!(
            root_txn_id,
            sequence,
            token = %token,
            to = %to_addr,
            root_chain = root_chain_id,
            amount = %amount,
            "Tokens released"
        );
        self.events.emit(BridgeEvent::BridgeSuccess {
            token_addr: token,
            to_addr,
            root_chain_id,
            destination_chain_id,
            root_txn_id: root_txn_id.to_string(),
            amount,
        });
        Ok(())
    }
}

// ============================================================================
// Entry Points
// ============================================================================

impl BridgeCoordinator {
    /// Dispatch an execute message sent by `caller`.
    pub fn execute(&self, caller: &Address, msg: ExecuteMsg) -> Result<Response, BridgeError> {
        let method = msg.method();
        let response = Response::new().add_attribute("method", method);

        match msg {
            ExecuteMsg::LockTokens {
                to_addr,
                destination_chain_id,
                token,
                amount,
            } => {
                self.lock_tokens(caller, &to_addr, destination_chain_id, token, amount)?;
                Ok(response
                    .add_attribute("sender", caller)
                    .add_attribute("recipient", to_addr)
                    .add_attribute("dest_chain", destination_chain_id)
                    .add_attribute("token", token)
                    .add_attribute("amount", amount))
            }
            ExecuteMsg::ReleaseTokens {
                token,
                to_addr,
                root_chain_id,
                destination_chain_id,
                root_txn_id,
                amount,
                signatures,
            } => {
                self.release_tokens(
                    token,
                    to_addr,
                    root_chain_id,
                    destination_chain_id,
                    &root_txn_id,
                    amount,
                    &signatures,
                )?;
                Ok(response
                    .add_attribute("root_txn_id", root_txn_id)
                    .add_attribute("recipient", to_addr)
                    .add_attribute("token", token)
                    .add_attribute("amount", amount))
            }
            ExecuteMsg::AddValidator {
                validator,
                nonce,
                signatures,
            } => {
                self.state
                    .add_validator(caller, validator, nonce, &signatures)?;
                Ok(response
                    .add_attribute("validator", validator)
                    .add_attribute("nonce", nonce))
            }
            ExecuteMsg::RemoveValidator {
                validator,
                nonce,
                signatures,
            } => {
                self.state
                    .remove_validator(caller, validator, nonce, &signatures)?;
                Ok(response
                    .add_attribute("validator", validator)
                    .add_attribute("nonce", nonce))
            }
            ExecuteMsg::AddToken {
                token,
                nonce,
                signatures,
            } => {
                self.state.add_token(caller, token, nonce, &signatures)?;
                Ok(response
                    .add_attribute("token", token)
                    .add_attribute("nonce", nonce))
            }
            ExecuteMsg::RemoveToken {
                token,
                nonce,
                signatures,
            } => {
                self.state.remove_token(caller, token, nonce, &signatures)?;
                Ok(response
                    .add_attribute("token", token)
                    .add_attribute("nonce", nonce))
            }
        }
    }

    /// Parse `json` as an [`ExecuteMsg`] and dispatch it.
    pub fn execute_json(&self, caller: &Address, json: &str) -> Result<Response, BridgeError> {
        let msg: ExecuteMsg = serde_json::from_str(json)?;
        self.execute(caller, msg)
    }

    /// Answer a query with its JSON-encoded response.
    pub fn query(&self, msg: QueryMsg) -> Result<serde_json::Value, BridgeError> {
        match msg {
            QueryMsg::Config {} => to_json_value(&query_config(self)),
            QueryMsg::Nonce {} => to_json_value(&query_nonce(self)),
            QueryMsg::IsValidator { address } => to_json_value(&query_is_validator(self, address)),
            QueryMsg::Validators {} => to_json_value(&query_validators(self)),
            QueryMsg::IsTokenValid { token } => to_json_value(&query_is_token_valid(self, token)),
            QueryMsg::Tokens {} => to_json_value(&query_tokens(self)),
            QueryMsg::IsProcessed { root_txn_id } => {
                to_json_value(&query_is_processed(self, root_txn_id))
            }
            QueryMsg::Release { root_txn_id } => to_json_value(&query_release(self, root_txn_id)),
            QueryMsg::Stats {} => to_json_value(&query_stats(self)),
            QueryMsg::ReleaseDigest {
                token,
                to_addr,
                root_chain_id,
                destination_chain_id,
                root_txn_id,
                amount,
            } => to_json_value(&query_release_digest(
                token,
                to_addr,
                root_chain_id,
                destination_chain_id,
                &root_txn_id,
                amount,
            )?),
            QueryMsg::GovernanceDigest { target, nonce } => {
                to_json_value(&query_governance_digest(target, nonce))
            }
        }
    }
}

/// Release digest for an ID the bridge accepts.
///
/// IDs longer than [`MAX_ROOT_TXN_ID_LEN`] bytes fail with `InvalidTxnId`.
pub(crate) fn release_digest(
    to_addr: &Address,
    root_chain_id: u32,
    destination_chain_id: u32,
    token: &Address,
    root_txn_id: &str,
    amount: U256,
) -> Result<[u8; 32], BridgeError> {
    if root_txn_id.len() > MAX_ROOT_TXN_ID_LEN {
        return Err(BridgeError::InvalidTxnId {
            reason: format!(
                "{} bytes exceeds the limit of {}",
                root_txn_id.len(),
                MAX_ROOT_TXN_ID_LEN
            ),
        });
    }
    compute_release_digest(
        to_addr,
        root_chain_id,
        destination_chain_id,
        token,
        root_txn_id,
        amount,
    )
    .map_err(|e| BridgeError::InvalidTxnId {
        reason: e.to_string(),
    })
}

fn to_json_value<T: Serialize>(response: &T) -> Result<serde_json::Value, BridgeError> {
    Ok(serde_json::to_value(response)?)
}
