//! Bridgeable tokens

use alloy::primitives::Address;

use super::{BridgeState, RegistryKind};
use crate::error::BridgeError;
use crate::events::BridgeEvent;

impl BridgeState {
    pub fn is_token_valid(&self, token: &Address) -> bool {
        self.inner.read().tokens.contains(token)
    }

    /// Tokens eligible for bridging, sorted
    pub fn tokens(&self) -> Vec<Address> {
        self.inner.read().tokens.iter().copied().collect()
    }

    /// Allow `token` to be locked. Consumes the shared governance nonce.
    pub fn add_token<S: AsRef<[u8]>>(
        &self,
        caller: &Address,
        token: Address,
        nonce: u64,
        signatures: &[S],
    ) -> Result<(), BridgeError> {
        self.govern("add_token", caller, &token, nonce, signatures, |state, _| {
            if !state.tokens.insert(token) {
                return Err(BridgeError::AlreadyActive {
                    kind: RegistryKind::Token,
                    address: token,
                });
            }
            Ok(BridgeEvent::TokenAdded {
                token_address: token,
            })
        })
    }

    pub fn remove_token<S: AsRef<[u8]>>(
        &self,
        caller: &Address,
        token: Address,
        nonce: u64,
        signatures: &[S],
    ) -> Result<(), BridgeError> {
        self.govern(
            "remove_token",
            caller,
            &token,
            nonce,
            signatures,
            |state, _| {
                if !state.tokens.remove(&token) {
                    return Err(BridgeError::NotActive { token });
                }
                Ok(BridgeEvent::TokenRemoved {
                    token_address: token,
                })
            },
        )
    }
}
