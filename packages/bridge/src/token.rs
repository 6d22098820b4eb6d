//! Token capability
//!
//! The bridge never moves balances itself. It asks the token, as the escrow
//! account, to transfer on its behalf. [`MemoryTokenLedger`] is an in-memory
//! ERC-20 style implementation for tests and local simulation.

use std::collections::{HashMap, HashSet};

use alloy::primitives::{Address, U256};
use parking_lot::Mutex;
use tracing::debug;

/// Balance operations the bridge needs from a token, seen from the escrow
/// account. Each call either fully succeeds (`true`) or changes nothing.
///
/// `transfer_from` runs while the bridge holds a read guard on its registry,
/// so implementations must not call back into the bridge's
/// [`BridgeState`](crate::registry::BridgeState).
pub trait TokenCapability: Send + Sync {
    /// The account locks pay into and releases pay out of
    fn escrow(&self) -> Address;

    /// Move `amount` of `token` from the escrow to `to`
    fn transfer(&self, token: &Address, to: &Address, amount: U256) -> bool;

    /// Move `amount` of `token` from `from` into the escrow, spending the
    /// allowance `from` granted the escrow
    fn transfer_from(&self, token: &Address, from: &Address, amount: U256) -> bool;

    fn balance_of(&self, token: &Address, owner: &Address) -> U256;
}

#[derive(Debug, Default)]
struct Books {
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    frozen: HashSet<Address>,
}

impl Books {
    fn balance(&self, token: &Address, owner: &Address) -> U256 {
        self.balances
            .get(&(*token, *owner))
            .copied()
            .unwrap_or_default()
    }

    fn move_balance(&mut self, token: &Address, from: &Address, to: &Address, amount: U256) -> bool {
        if self.frozen.contains(token) {
            return false;
        }
        let from_balance = self.balance(token, from);
        if from_balance < amount {
            return false;
        }
        self.balances.insert((*token, *from), from_balance - amount);
        let to_balance = self.balance(token, to);
        self.balances
            .insert((*token, *to), to_balance.saturating_add(amount));
        true
    }
}

/// Thread-safe in-memory token balances with ERC-20 allowances
#[derive(Debug)]
pub struct MemoryTokenLedger {
    escrow: Address,
    books: Mutex<Books>,
}

impl MemoryTokenLedger {
    /// `escrow` is the account `transfer` debits, `transfer_from` credits and
    /// the spender `transfer_from` checks allowances for.
    pub fn new(escrow: Address) -> Self {
        Self {
            escrow,
            books: Mutex::new(Books::default()),
        }
    }

    /// Credit `amount` to `to` out of thin air
    pub fn mint(&self, token: &Address, to: &Address, amount: U256) {
        let mut books = self.books.lock();
        let balance = books.balance(token, to);
        books
            .balances
            .insert((*token, *to), balance.saturating_add(amount));
    }

    /// Set the allowance `owner` grants `spender`
    pub fn approve(&self, token: &Address, owner: &Address, spender: &Address, amount: U256) {
        self.books
            .lock()
            .allowances
            .insert((*token, *owner, *spender), amount);
    }

    pub fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> U256 {
        self.books
            .lock()
            .allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Make every transfer of `token` fail until unfrozen
    pub fn set_frozen(&self, token: &Address, frozen: bool) {
        let mut books = self.books.lock();
        if frozen {
            books.frozen.insert(*token);
        } else {
            books.frozen.remove(token);
        }
    }
}

impl TokenCapability for MemoryTokenLedger {
    fn escrow(&self) -> Address {
        self.escrow
    }

    fn transfer(&self, token: &Address, to: &Address, amount: U256) -> bool {
        let moved = self
            .books
            .lock()
            .move_balance(token, &self.escrow, to, amount);
        debug!(token = %token, to = %to, amount = %amount, moved, "transfer");
        moved
    }

    fn transfer_from(&self, token: &Address, from: &Address, amount: U256) -> bool {
        let mut books = self.books.lock();
        let key = (*token, *from, self.escrow);
        let allowance = books.allowances.get(&key).copied().unwrap_or_default();
        if allowance < amount {
            debug!(token = %token, from = %from, amount = %amount, "transfer_from: allowance too low");
            return false;
        }
        if !books.move_balance(token, from, &self.escrow, amount) {
            debug!(token = %token, from = %from, amount = %amount, "transfer_from: balance too low");
            return false;
        }
        books.allowances.insert(key, allowance - amount);
        true
    }

    fn balance_of(&self, token: &Address, owner: &Address) -> U256 {
        self.books.lock().balance(token, owner)
    }
}
