//! Signature recovery and quorum verification
//!
//! Soldiers sign digests as Ethereum personal messages, so every digest is
//! wrapped in the EIP-191 envelope before recovery. Signatures are the raw
//! 65-byte `r || s || v` form, with `v` either a bare parity bit (0/1) or the
//! legacy 27/28.

use std::collections::BTreeSet;

use alloy::primitives::{Address, PrimitiveSignature, B256, U256};
use bridge_common::eth_signed_message_hash;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::state::SIGNATURE_LENGTH;

/// Split a raw signature into alloy's signature type.
fn parse_signature(signature: &[u8]) -> Result<PrimitiveSignature, BridgeError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(BridgeError::MalformedSignature {
            reason: format!(
                "expected {} bytes, got {}",
                SIGNATURE_LENGTH,
                signature.len()
            ),
        });
    }

    let y_parity = match signature[64] {
        0 | 27 => false,
        1 | 28 => true,
        v => {
            return Err(BridgeError::MalformedSignature {
                reason: format!("unsupported recovery byte {}", v),
            })
        }
    };

    let r = U256::from_be_slice(&signature[..32]);
    let s = U256::from_be_slice(&signature[32..64]);
    Ok(PrimitiveSignature::new(r, s, y_parity))
}

/// Recover the address that signed `digest`.
///
/// Deterministic and side-effect free. Fails with `MalformedSignature` when the
/// bytes do not describe a signature that recovers to a public key.
pub fn recover(digest: &[u8; 32], signature: &[u8]) -> Result<Address, BridgeError> {
    let parsed = parse_signature(signature)?;
    let prehash = B256::from(eth_signed_message_hash(digest));
    parsed
        .recover_address_from_prehash(&prehash)
        .map_err(|e| BridgeError::MalformedSignature {
            reason: e.to_string(),
        })
}

/// Check that `signatures` carry a quorum of distinct authorized soldiers.
///
/// Checks run in a fixed order over the whole list: recovery, then
/// duplicates, then membership, then the threshold. Returns the recovered
/// signers in submission order.
pub fn verify_quorum<S: AsRef<[u8]>>(
    digest: &[u8; 32],
    signatures: &[S],
    authorized: &BTreeSet<Address>,
    threshold: usize,
) -> Result<Vec<Address>, BridgeError> {
    let mut signers = Vec::with_capacity(signatures.len());
    for (index, signature) in signatures.iter().enumerate() {
        let signer = recover(digest, signature.as_ref()).map_err(|err| {
            warn!(index, error = %err, "Rejected unrecoverable signature");
            err
        })?;
        debug!(index, signer = %signer, "Recovered signer");
        signers.push(signer);
    }

    let mut seen = BTreeSet::new();
    for signer in &signers {
        if !seen.insert(*signer) {
            warn!(signer = %signer, "Rejected duplicated signature");
            return Err(BridgeError::DuplicateSignature { signer: *signer });
        }
    }

    if let Some(outsider) = signers.iter().find(|s| !authorized.contains(*s)) {
        warn!(signer = %outsider, "Rejected signature from non-soldier");
        return Err(BridgeError::InvalidSignature { signer: *outsider });
    }

    if signers.len() < threshold {
        warn!(
            got = signers.len(),
            required = threshold,
            "Rejected under-signed request"
        );
        return Err(BridgeError::InsufficientSignatures {
            got: signers.len(),
            required: threshold,
        });
    }

    Ok(signers)
}
