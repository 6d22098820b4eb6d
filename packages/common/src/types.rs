//! Address parsing shared by bridge instances and off-chain signers
//!
//! Addresses are alloy's 20-byte [`Address`]. Config files and relayers may
//! also hand over the 32-byte zero-padded form used by non-EVM chains.

use alloy::primitives::Address;
use eyre::{eyre, Result};

// ============================================================================
// Addresses
// ============================================================================

/// Parse an EVM address from hex (with or without 0x prefix)
///
/// Accepts both 20-byte addresses (40 hex chars) and 32-byte padded addresses
/// (64 hex chars). For 32-byte addresses, the first 12 bytes must be zeros
/// and the last 20 bytes are extracted.
pub fn parse_evm_address(hex: &str) -> Result<Address> {
    let hex = hex.trim();
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let bytes = hex::decode(hex)?;

    match bytes.len() {
        20 => Ok(Address::from_slice(&bytes)),
        32 => {
            if bytes[..12].iter().any(|&b| b != 0) {
                return Err(eyre!(
                    "32-byte address has non-zero padding: expected 12 leading zero bytes"
                ));
            }
            Ok(Address::from_slice(&bytes[12..]))
        }
        len => Err(eyre!("address must be 20 or 32 bytes, got {} bytes", len)),
    }
}

/// Parse a comma-separated list of EVM addresses, skipping empty entries
pub fn parse_address_list(list: &str) -> Result<Vec<Address>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_evm_address(s).map_err(|e| eyre!("invalid address {:?}: {}", s, e)))
        .collect()
}
