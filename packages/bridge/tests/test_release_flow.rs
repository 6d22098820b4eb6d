//! Release flow integration tests.
//!
//! Tests escrow release on a quorum of soldier signatures:
//! - successful release moves funds and marks the root transaction
//! - a root transaction is released at most once, whatever the signers or payload
//! - signature failures and transfer failures leave the ledger untouched

mod common;

use alloy::primitives::{Address, Bytes, U256};
use soldier_bridge::{BridgeError, BridgeEvent, TokenCapability};

use common::{release_sigs, setup, setup_with, ESCROW, NETWORK_ID, TOKEN_X, TOKEN_Y, USER};

fn fund_escrow(env: &common::TestEnv, amount: u64) {
    env.token.mint(&TOKEN_X, &ESCROW, U256::from(amount));
}

#[test]
fn test_release_moves_funds_and_marks_ledger() {
    let env = setup();
    fund_escrow(&env, 1000);
    let one = U256::from(1u64);

    let sigs = release_sigs(&env.soldiers(), TOKEN_X, USER, 1, "tx1", one);
    env.bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &sigs)
        .unwrap();

    assert_eq!(env.token.balance_of(&TOKEN_X, &ESCROW), U256::from(999u64));
    assert_eq!(
        env.token.balance_of(&TOKEN_X, &USER),
        one
    );
    assert!(env.bridge.ledger().is_processed("tx1"));

    let record = env.bridge.ledger().record("tx1").unwrap();
    assert_eq!(record.sequence, 0);
    assert_eq!(record.recipient, USER);
    assert_eq!(record.signers.len(), 3);

    assert_eq!(
        env.events.drain(),
        vec![BridgeEvent::BridgeSuccess {
            token_addr: TOKEN_X,
            to_addr: USER,
            root_chain_id: 1,
            destination_chain_id: NETWORK_ID,
            root_txn_id: "tx1".to_string(),
            amount: one,
        }]
    );
}

#[test]
fn test_release_replay_rejected_regardless_of_signers() {
    let env = setup();
    fund_escrow(&env, 1000);
    let one = U256::from(1u64);

    let sigs = release_sigs(&env.soldiers(), TOKEN_X, USER, 1, "tx1", one);
    env.bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &sigs)
        .unwrap();

    // Exact resubmission
    let err = env
        .bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &sigs)
        .unwrap_err();
    assert_eq!(
        err,
        BridgeError::AlreadyProcessed {
            root_txn_id: "tx1".to_string()
        }
    );
    assert_eq!(err.to_string(), "Transaction ID already processed: tx1");

    // Different amount and recipient, same soldiers
    let other = Address::repeat_byte(0x42);
    let five = U256::from(5u64);
    let sigs = release_sigs(&env.soldiers(), TOKEN_X, other, 1, "tx1", five);
    let err = env
        .bridge
        .release_tokens(TOKEN_X, other, 1, NETWORK_ID, "tx1", five, &sigs)
        .unwrap_err();
    assert_eq!(err.kind(), "already_processed");

    assert_eq!(env.token.balance_of(&TOKEN_X, &ESCROW), U256::from(999u64));
    assert_eq!(env.bridge.ledger().len(), 1);
    assert!(env.events.is_empty());
}

#[test]
fn test_release_replay_with_new_soldiers() {
    let env = setup();
    fund_escrow(&env, 1000);
    let one = U256::from(1u64);
    let caller = env.a.address();

    let sigs = release_sigs(&env.soldiers(), TOKEN_X, USER, 1, "tx1", one);
    env.bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &sigs)
        .unwrap();

    // Bring D, E, F in so they form a quorum on their own
    let state = env.bridge.state();
    for (nonce, newcomer) in env.outsiders().iter().enumerate() {
        let sigs = common::governance_sigs(&env.soldiers(), newcomer.address(), nonce as u64);
        state
            .add_validator(&caller, newcomer.address(), nonce as u64, &sigs)
            .unwrap();
    }

    let sigs = release_sigs(&env.outsiders(), TOKEN_X, USER, 1, "tx1", one);
    let err = env
        .bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &sigs)
        .unwrap_err();
    assert_eq!(err.kind(), "already_processed");

    // A fresh id still goes through with the new soldiers
    let sigs = release_sigs(&env.outsiders(), TOKEN_X, USER, 1, "tx2", one);
    env.bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx2", one, &sigs)
        .unwrap();
    assert_eq!(env.bridge.ledger().record("tx2").unwrap().sequence, 1);
}

#[test]
fn test_signature_errors_take_precedence_over_ledger() {
    let env = setup();
    fund_escrow(&env, 1000);
    let one = U256::from(1u64);

    let sigs = release_sigs(&env.soldiers(), TOKEN_X, USER, 1, "tx1", one);
    env.bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &sigs)
        .unwrap();

    let short = release_sigs(&[&env.a, &env.b], TOKEN_X, USER, 1, "tx1", one);
    let err = env
        .bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &short)
        .unwrap_err();
    assert_eq!(
        err,
        BridgeError::InsufficientSignatures {
            got: 2,
            required: 3
        }
    );
}

#[test]
fn test_release_signature_failures() {
    let env = setup();
    fund_escrow(&env, 1000);
    let one = U256::from(1u64);

    let dup = release_sigs(&[&env.a, &env.b, &env.b], TOKEN_X, USER, 1, "tx1", one);
    let err = env
        .bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &dup)
        .unwrap_err();
    assert_eq!(
        err,
        BridgeError::DuplicateSignature {
            signer: env.b.address()
        }
    );

    let outsider = release_sigs(&[&env.a, &env.b, &env.d], TOKEN_X, USER, 1, "tx1", one);
    let err = env
        .bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &outsider)
        .unwrap_err();
    assert_eq!(
        err,
        BridgeError::InvalidSignature {
            signer: env.d.address()
        }
    );

    let mut malformed = release_sigs(&env.soldiers(), TOKEN_X, USER, 1, "tx1", one);
    malformed[1] = Bytes::from(vec![1u8; 64]);
    let err = env
        .bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &malformed)
        .unwrap_err();
    assert_eq!(err.kind(), "malformed_signature");

    // Signed for amount 1, submitted for amount 2
    let sigs = release_sigs(&env.soldiers(), TOKEN_X, USER, 1, "tx1", one);
    let err = env
        .bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", U256::from(2u64), &sigs)
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::InvalidSignature { .. } | BridgeError::MalformedSignature { .. }
    ));

    assert!(!env.bridge.ledger().is_processed("tx1"));
    assert_eq!(env.token.balance_of(&TOKEN_X, &ESCROW), U256::from(1000u64));
    assert!(env.events.is_empty());
}

#[test]
fn test_transfer_failure_leaves_ledger_unmarked() {
    let env = setup();
    let one = U256::from(1u64);

    // Escrow is empty
    let sigs = release_sigs(&env.soldiers(), TOKEN_X, USER, 1, "tx1", one);
    let err = env
        .bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &sigs)
        .unwrap_err();
    assert_eq!(
        err,
        BridgeError::TransferFailed {
            token: TOKEN_X,
            from: ESCROW,
            to: USER,
            amount: one,
        }
    );
    assert!(!env.bridge.ledger().is_processed("tx1"));
    assert!(env.events.is_empty());

    // Once funded, the same signatures succeed
    fund_escrow(&env, 10);
    env.bridge
        .release_tokens(TOKEN_X, USER, 1, NETWORK_ID, "tx1", one, &sigs)
        .unwrap();
    assert!(env.bridge.ledger().is_processed("tx1"));
}

#[test]
fn test_frozen_token_release_fails() {
    let env = setup_with(3, &[TOKEN_Y]);
    env.token.mint(&TOKEN_Y, &ESCROW, U256::from(50u64));
    env.token.set_frozen(&TOKEN_Y, true);
    let ten = U256::from(10u64);

    let sigs = release_sigs(&env.soldiers(), TOKEN_Y, USER, 7, "0xabc", ten);
    let err = env
        .bridge
        .release_tokens(TOKEN_Y, USER, 7, NETWORK_ID, "0xabc", ten, &sigs)
        .unwrap_err();
    assert_eq!(err.kind(), "transfer_failed");
    assert_eq!(env.bridge.stats().total_releases, 0);
}
