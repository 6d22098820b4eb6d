//! Soldier membership

use alloy::primitives::Address;

use super::{BridgeState, RegistryKind};
use crate::error::BridgeError;
use crate::events::BridgeEvent;

impl BridgeState {
    pub fn is_validator(&self, address: &Address) -> bool {
        self.inner.read().validators.contains(address)
    }

    /// Current soldiers, sorted
    pub fn validators(&self) -> Vec<Address> {
        self.inner.read().validators.iter().copied().collect()
    }

    /// Add a soldier. `caller` must be a soldier and `signatures` a quorum over
    /// the governance digest of (`validator`, `nonce`). The zero address is
    /// never admitted.
    pub fn add_validator<S: AsRef<[u8]>>(
        &self,
        caller: &Address,
        validator: Address,
        nonce: u64,
        signatures: &[S],
    ) -> Result<(), BridgeError> {
        self.govern(
            "add_validator",
            caller,
            &validator,
            nonce,
            signatures,
            |state, _| {
                if validator == Address::ZERO {
                    return Err(BridgeError::ZeroAddress);
                }
                if !state.validators.insert(validator) {
                    return Err(BridgeError::AlreadyActive {
                        kind: RegistryKind::Validator,
                        address: validator,
                    });
                }
                Ok(BridgeEvent::ValidatorAdded {
                    validator_address: validator,
                })
            },
        )
    }

    /// Remove a soldier, refusing to drop the set below the threshold.
    pub fn remove_validator<S: AsRef<[u8]>>(
        &self,
        caller: &Address,
        validator: Address,
        nonce: u64,
        signatures: &[S],
    ) -> Result<(), BridgeError> {
        self.govern(
            "remove_validator",
            caller,
            &validator,
            nonce,
            signatures,
            |state, threshold| {
                if !state.validators.contains(&validator) {
                    return Err(BridgeError::NotAMember { address: validator });
                }
                let remaining = state.validators.len() - 1;
                if remaining < threshold {
                    return Err(BridgeError::QuorumTooSmall {
                        remaining,
                        threshold,
                    });
                }
                state.validators.remove(&validator);
                Ok(BridgeEvent::ValidatorRemoved {
                    validator_address: validator,
                })
            },
        )
    }
}
