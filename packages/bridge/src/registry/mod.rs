//! Soldier and token registries
//!
//! Both sets and the shared governance nonce live behind one lock, so a
//! governance action sees and mutates them atomically:
//!
//! 1. caller must be a soldier
//! 2. nonce must equal the current nonce
//! 3. signatures must form a quorum over `governance_digest(target, nonce)`
//! 4. the membership precondition of the action must hold
//! 5. the set is mutated and the nonce advances
//! 6. one event is emitted
//!
//! The write guard is held from step 1 to step 5. Events are emitted after it
//! is released, in nonce order.

mod tokens;
mod validators;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use alloy::primitives::Address;
use bridge_common::compute_governance_digest;
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::BridgeError;
use crate::events::{BridgeEvent, EventSink};
use crate::signature::verify_quorum;

/// Which registry a governance action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    Validator,
    Token,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Validator => write!(f, "Soldier"),
            RegistryKind::Token => write!(f, "Token"),
        }
    }
}

/// Registry contents guarded by [`BridgeState`]'s lock
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    validators: BTreeSet<Address>,
    tokens: BTreeSet<Address>,
    nonce: u64,
}

impl RegistryState {
    pub fn validators(&self) -> &BTreeSet<Address> {
        &self.validators
    }

    pub fn tokens(&self) -> &BTreeSet<Address> {
        &self.tokens
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

/// Soldier set, token set and governance nonce of one bridge instance.
pub struct BridgeState {
    inner: RwLock<RegistryState>,
    threshold: usize,
    events: Arc<dyn EventSink>,
    /// Taken before the write guard is released, held until the event is out
    emit_order: Mutex<()>,
}

impl BridgeState {
    /// Build a registry from seed lists.
    ///
    /// Duplicate seeds collapse before the size check. Fails with
    /// `InvalidConfig` when the threshold is zero, a seed soldier is the zero
    /// address, or the threshold exceeds the number of distinct soldiers.
    pub fn new(
        validators: impl IntoIterator<Item = Address>,
        tokens: impl IntoIterator<Item = Address>,
        threshold: usize,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, BridgeError> {
        let validators: BTreeSet<Address> = validators.into_iter().collect();
        let tokens: BTreeSet<Address> = tokens.into_iter().collect();

        if threshold == 0 {
            return Err(BridgeError::InvalidConfig {
                reason: "quorum threshold must be at least 1".to_string(),
            });
        }
        if validators.contains(&Address::ZERO) {
            return Err(BridgeError::InvalidConfig {
                reason: "zero address cannot be a soldier".to_string(),
            });
        }
        if validators.len() < threshold {
            return Err(BridgeError::InvalidConfig {
                reason: format!(
                    "{} distinct soldiers cannot meet a threshold of {}",
                    validators.len(),
                    threshold
                ),
            });
        }

        info!(
            soldiers = validators.len(),
            tokens = tokens.len(),
            threshold,
            "Initialized bridge registry"
        );

        Ok(Self {
            inner: RwLock::new(RegistryState {
                validators,
                tokens,
                nonce: 0,
            }),
            threshold,
            events,
            emit_order: Mutex::new(()),
        })
    }

    /// Signatures required for any authorized action
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Nonce the next governance action must carry
    pub fn current_nonce(&self) -> u64 {
        self.inner.read().nonce
    }

    /// Hold a consistent view of the registry. Governance actions block until
    /// the guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.inner.read()
    }

    /// Caller, nonce and quorum checks shared by every governance action.
    /// Returns the nonce that becomes current once the action applies.
    fn authorize<S: AsRef<[u8]>>(
        &self,
        state: &RegistryState,
        caller: &Address,
        target: &Address,
        nonce: u64,
        signatures: &[S],
    ) -> Result<u64, BridgeError> {
        if !state.validators.contains(caller) {
            return Err(BridgeError::Unauthorized { caller: *caller });
        }

        let invalid_nonce = BridgeError::InvalidNonce {
            expected: state.nonce,
            got: nonce,
        };
        if nonce != state.nonce {
            return Err(invalid_nonce);
        }
        let next_nonce = nonce.checked_add(1).ok_or(invalid_nonce)?;

        let digest = compute_governance_digest(target, nonce);
        verify_quorum(&digest, signatures, &state.validators, self.threshold)?;

        Ok(next_nonce)
    }

    /// Run one governance action under the write lock.
    ///
    /// `apply` checks the action's precondition and, only if it holds, mutates
    /// the state and returns the event to emit.
    fn govern<S, F>(
        &self,
        action: &'static str,
        caller: &Address,
        target: &Address,
        nonce: u64,
        signatures: &[S],
        apply: F,
    ) -> Result<(), BridgeError>
    where
        S: AsRef<[u8]>,
        F: FnOnce(&mut RegistryState, usize) -> Result<BridgeEvent, BridgeError>,
    {
        let mut state = self.inner.write();

        let result = self
            .authorize(&state, caller, target, nonce, signatures)
            .and_then(|next_nonce| {
                let event = apply(&mut *state, self.threshold)?;
                state.nonce = next_nonce;
                Ok(event)
            });

        match result {
            Ok(event) => {
                let _order = self.emit_order.lock();
                drop(state);
                info!(action, target = %target, nonce, "Governance action applied");
                self.events.emit(event);
                Ok(())
            }
            Err(err) => {
                drop(state);
                warn!(
                    action,
                    target = %target,
                    nonce,
                    caller = %caller,
                    error = err.kind(),
                    "Governance action rejected"
                );
                Err(err)
            }
        }
    }
}
