// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::{FieldElement, LeafIndex};
use ledger_core::{
    types::{PrivateKey, PublicKey},
    AccountLedger,
    LedgerAnchor,
};
use rand::rngs::OsRng;
use tari_crypto::keys::PublicKey as _;

pub struct Account {
    pub index: LeafIndex,
    pub secret: PrivateKey,
    pub public: PublicKey,
}

pub fn new_account(index: LeafIndex) -> Account {
    let (secret, public) = PublicKey::random_keypair(&mut OsRng);
    Account { index, secret, public }
}

/// Opens each `(account, balance)` in a fresh ledger of the given height and anchors its root
pub fn create_ledger(height: usize, balances: &[(&Account, u64)]) -> (AccountLedger, LedgerAnchor) {
    let mut ledger = AccountLedger::new(height).unwrap();
    for (account, balance) in balances {
        ledger
            .open_account(account.index, &account.public, FieldElement::from(*balance))
            .unwrap();
    }
    let anchor = LedgerAnchor::new(height);
    anchor.init(ledger.root()).unwrap();
    (ledger, anchor)
}

pub fn balance_of(ledger: &AccountLedger, index: LeafIndex) -> u64 {
    ledger
        .account(index)
        .unwrap()
        .map(|a| a.balance.as_u64().unwrap())
        .unwrap_or(0)
}

pub fn total_balance(ledger: &AccountLedger) -> u64 {
    ledger
        .tree()
        .leaves()
        .map(|(index, _)| balance_of(ledger, index))
        .sum()
}
