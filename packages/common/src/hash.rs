//! Digest computation for soldier-signed bridge messages
//!
//! Soldiers sign two kinds of 32-byte digests. Every bridge instance, and every
//! relayer collecting signatures, must build them byte-for-byte identically.
//!
//! ## Release digest
//!
//! ```text
//! | recipient (20) | root chain (4) | destination chain (4) | token (20) |
//! | txn id length (4) | txn id (n) | amount (32) |
//! ```
//!
//! Chain IDs and the txn id length are big-endian `u32`. The amount is a
//! big-endian `uint256`.
//!
//! ## Governance digest
//!
//! ```text
//! | target address (20) | nonce as uint256 (32) |
//! ```
//!
//! ## Signing hash
//!
//! Digests are signed as Ethereum personal messages, so the hash that is
//! actually fed to ECDSA is
//! `keccak256("\x19Ethereum Signed Message:\n32" ++ digest)`.

use alloy::primitives::{Address, U256};
use eyre::{eyre, Result};
use tiny_keccak::{Hasher, Keccak};

/// EIP-191 prefix for a 32-byte personal message
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Fixed part of the release digest preimage (everything except the txn id)
const RELEASE_FIXED_LEN: usize = 20 + 4 + 4 + 20 + 4 + 32;

/// Compute keccak256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Compute the digest soldiers sign to authorize a release.
///
/// `root_chain_id` is the chain the tokens were locked on, `destination_chain_id`
/// the chain they are released on. `root_txn_id` is the lock transaction on the
/// root chain and is what makes the release unique.
///
/// Fails when the txn id is too long for its `u32` length prefix.
pub fn compute_release_digest(
    to: &Address,
    root_chain_id: u32,
    destination_chain_id: u32,
    token: &Address,
    root_txn_id: &str,
    amount: U256,
) -> Result<[u8; 32]> {
    let txn_id = root_txn_id.as_bytes();
    let txn_id_len = txn_id_length_prefix(txn_id.len())?;
    let mut data = Vec::with_capacity(RELEASE_FIXED_LEN + txn_id.len());

    data.extend_from_slice(to.as_slice());
    data.extend_from_slice(&root_chain_id.to_be_bytes());
    data.extend_from_slice(&destination_chain_id.to_be_bytes());
    data.extend_from_slice(token.as_slice());

    // Length prefix keeps the variable-width id unambiguous
    data.extend_from_slice(&txn_id_len);
    data.extend_from_slice(txn_id);

    data.extend_from_slice(&amount.to_be_bytes::<32>());

    Ok(keccak256(&data))
}

fn txn_id_length_prefix(len: usize) -> Result<[u8; 4]> {
    let len = u32::try_from(len)
        .map_err(|_| eyre!("txn id of {} bytes does not fit a u32 length prefix", len))?;
    Ok(len.to_be_bytes())
}

/// Compute the digest soldiers sign to authorize a governance action
/// (adding or removing a soldier or a token).
///
/// The same layout is used for all four actions; the shared nonce is what
/// prevents a signature set from being used twice.
pub fn compute_governance_digest(target: &Address, nonce: u64) -> [u8; 32] {
    // 20 + 32 = 52 bytes
    let mut data = [0u8; 52];

    data[0..20].copy_from_slice(target.as_slice());

    // uint256 nonce - u64 goes into the last 8 bytes
    data[20 + 24..52].copy_from_slice(&nonce.to_be_bytes());

    keccak256(&data)
}

/// Wrap a digest in the EIP-191 personal-message envelope.
///
/// This is the hash wallets actually sign when asked to sign a 32-byte
/// message, and therefore the hash signatures are recovered against.
pub fn eth_signed_message_hash(digest: &[u8; 32]) -> [u8; 32] {
    let mut data = [0u8; 60];
    data[..28].copy_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    data[28..].copy_from_slice(digest);
    keccak256(&data)
}

/// Convert bytes to hex string with 0x prefix
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}
