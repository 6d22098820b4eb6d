//! Bridge-Common: digest construction shared by Soldier Bridge instances and signers
//!
//! Soldiers sign digests off-chain and every bridge instance verifies them
//! locally, so both sides must agree on the exact bytes:
//!
//! - **Hash Computation** - release and governance digests, EIP-191 signing hash
//! - **Types** - EVM address parsing helpers
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! bridge-common = { path = "../common" }
//! ```

pub mod hash;
pub mod types;

pub use hash::{
    bytes32_to_hex, compute_governance_digest, compute_release_digest, eth_signed_message_hash,
    keccak256, ETH_SIGNED_MESSAGE_PREFIX,
};
pub use types::{parse_address_list, parse_evm_address};
