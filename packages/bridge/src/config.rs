//! Bridge configuration

use std::collections::BTreeSet;
use std::env;

use alloy::primitives::Address;
use bridge_common::{parse_address_list, parse_evm_address};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::state::DEFAULT_QUORUM_THRESHOLD;

/// Construction-time configuration of one bridge instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Chain ID of the chain this instance runs on
    pub network_id: u32,
    /// Escrow account holding locked tokens
    pub bridge_address: Address,
    /// Signatures required for any authorized action
    #[serde(default = "default_quorum_threshold")]
    pub quorum_threshold: usize,
    /// Initial soldiers
    pub validators: Vec<Address>,
    /// Initially bridgeable tokens
    #[serde(default)]
    pub tokens: Vec<Address>,
}

fn default_quorum_threshold() -> usize {
    DEFAULT_QUORUM_THRESHOLD
}

impl BridgeConfig {
    /// Load configuration from environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }

        let network_id = env::var("BRIDGE_NETWORK_ID")
            .map_err(|_| eyre!("BRIDGE_NETWORK_ID required"))?
            .trim()
            .parse()
            .map_err(|_| eyre!("Invalid BRIDGE_NETWORK_ID"))?;

        let bridge_address = parse_evm_address(
            &env::var("BRIDGE_ADDRESS").map_err(|_| eyre!("BRIDGE_ADDRESS required"))?,
        )
        .map_err(|e| eyre!("Invalid BRIDGE_ADDRESS: {}", e))?;

        let validators = parse_address_list(
            &env::var("BRIDGE_VALIDATORS").map_err(|_| eyre!("BRIDGE_VALIDATORS required"))?,
        )
        .map_err(|e| eyre!("Invalid BRIDGE_VALIDATORS: {}", e))?;

        let tokens = match env::var("BRIDGE_TOKENS") {
            Ok(list) => {
                parse_address_list(&list).map_err(|e| eyre!("Invalid BRIDGE_TOKENS: {}", e))?
            }
            Err(_) => Vec::new(),
        };

        let quorum_threshold = match env::var("BRIDGE_QUORUM_THRESHOLD") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| eyre!("Invalid BRIDGE_QUORUM_THRESHOLD"))?,
            Err(_) => DEFAULT_QUORUM_THRESHOLD,
        };

        let config = Self {
            network_id,
            bridge_address,
            quorum_threshold,
            validators,
            tokens,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config, applying defaults for omitted optional fields
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a registry must start from
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.quorum_threshold == 0 {
            return Err(BridgeError::InvalidConfig {
                reason: "quorum_threshold must be at least 1".to_string(),
            });
        }

        if self.validators.contains(&Address::ZERO) {
            return Err(BridgeError::InvalidConfig {
                reason: "zero address cannot be a soldier".to_string(),
            });
        }

        let distinct: BTreeSet<&Address> = self.validators.iter().collect();
        if distinct.len() < self.quorum_threshold {
            return Err(BridgeError::InvalidConfig {
                reason: format!(
                    "{} distinct soldiers cannot meet a threshold of {}",
                    distinct.len(),
                    self.quorum_threshold
                ),
            });
        }

        Ok(())
    }
}
