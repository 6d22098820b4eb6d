//! Shared fixture for Soldier Bridge integration tests.
//!
//! Soldier keys are derived from repeated seed bytes so every run signs with
//! the same addresses. Signing goes through alloy's `sign_message_sync`, the
//! same EIP-191 personal-message path a wallet uses.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use alloy::primitives::{address, Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use bridge_common::{compute_governance_digest, compute_release_digest};
use soldier_bridge::{BridgeConfig, BridgeCoordinator, EventLog, MemoryTokenLedger};

pub const NETWORK_ID: u32 = 0;
pub const ESCROW: Address = address!("e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5");
pub const TOKEN_X: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const TOKEN_Y: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const USER: Address = address!("9296bE4959E56b5DF2200DBfA30594504a7feD61");

static TRACING: Once = Once::new();

/// Install a test-writer subscriber honouring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn soldier(seed: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(seed)).unwrap()
}

/// Sign `digest` the way a wallet signs a 32-byte message
pub fn sign(signer: &PrivateKeySigner, digest: &[u8; 32]) -> Bytes {
    Bytes::from(signer.sign_message_sync(digest).unwrap().as_bytes().to_vec())
}

pub fn sign_all(signers: &[&PrivateKeySigner], digest: &[u8; 32]) -> Vec<Bytes> {
    signers.iter().map(|s| sign(s, digest)).collect()
}

pub fn governance_sigs(signers: &[&PrivateKeySigner], target: Address, nonce: u64) -> Vec<Bytes> {
    sign_all(signers, &compute_governance_digest(&target, nonce))
}

pub fn release_sigs(
    signers: &[&PrivateKeySigner],
    token: Address,
    to: Address,
    root_chain_id: u32,
    root_txn_id: &str,
    amount: U256,
) -> Vec<Bytes> {
    let digest =
        compute_release_digest(&to, root_chain_id, NETWORK_ID, &token, root_txn_id, amount).unwrap();
    sign_all(signers, &digest)
}

pub struct TestEnv {
    pub bridge: BridgeCoordinator,
    pub token: Arc<MemoryTokenLedger>,
    pub events: Arc<EventLog>,
    /// Seeded soldiers A, B, C
    pub a: PrivateKeySigner,
    pub b: PrivateKeySigner,
    pub c: PrivateKeySigner,
    /// Keys that are not soldiers at setup
    pub d: PrivateKeySigner,
    pub e: PrivateKeySigner,
    pub f: PrivateKeySigner,
}

impl TestEnv {
    pub fn soldiers(&self) -> [&PrivateKeySigner; 3] {
        [&self.a, &self.b, &self.c]
    }

    pub fn outsiders(&self) -> [&PrivateKeySigner; 3] {
        [&self.d, &self.e, &self.f]
    }
}

/// Soldiers {A, B, C}, threshold 3, nonce 0, no tokens, empty escrow.
pub fn setup() -> TestEnv {
    setup_with(3, &[])
}

pub fn setup_with(threshold: usize, tokens: &[Address]) -> TestEnv {
    init_tracing();

    let (a, b, c) = (soldier(1), soldier(2), soldier(3));
    let (d, e, f) = (soldier(4), soldier(5), soldier(6));

    let config = BridgeConfig {
        network_id: NETWORK_ID,
        bridge_address: ESCROW,
        quorum_threshold: threshold,
        validators: vec![a.address(), b.address(), c.address()],
        tokens: tokens.to_vec(),
    };

    let token = Arc::new(MemoryTokenLedger::new(ESCROW));
    let events = Arc::new(EventLog::new());
    let bridge = BridgeCoordinator::instantiate(&config, token.clone(), events.clone())
        .expect("instantiate bridge");

    TestEnv {
        bridge,
        token,
        events,
        a,
        b,
        c,
        d,
        e,
        f,
    }
}
