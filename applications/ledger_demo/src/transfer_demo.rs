// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::FieldElement;
use ledger_core::{types::PublicKey, AccountLedger, LedgerAnchor, LedgerConfig};
use log::*;
use rand::rngs::OsRng;
use tari_crypto::keys::PublicKey as _;

const LOG_TARGET: &str = "ledger::demo::transfer";

pub struct TransferSummary {
    pub sender_balance: FieldElement,
    pub recipient_balance: FieldElement,
    pub initial_root: FieldElement,
    pub final_root: FieldElement,
}

/// Opens a funded account at leaf 0, anchors the ledger and sends `amount` to a new account at `recipient`.
pub fn run_transfer_demo(
    config: &LedgerConfig,
    initial_balance: u64,
    amount: u64,
    recipient: u64,
) -> Result<TransferSummary, anyhow::Error> {
    config.validate()?;
    let (sender_secret, sender_key) = PublicKey::random_keypair(&mut OsRng);
    let (_, recipient_key) = PublicKey::random_keypair(&mut OsRng);

    let mut ledger = AccountLedger::new(config.tree_height)?;
    let initial_root = ledger.open_account(0, &sender_key, FieldElement::from(initial_balance))?;
    let anchor = LedgerAnchor::new(config.tree_height);
    anchor.init(initial_root)?;
    info!(target: LOG_TARGET, "Ledger anchored at root {}", initial_root);

    let prepared = ledger.prepare_transfer(0, &sender_secret, recipient, &recipient_key, FieldElement::from(amount))?;
    let final_root = anchor.transfer(&prepared.transfer)?;
    ledger.apply(prepared);

    let balance = |index| -> Result<FieldElement, anyhow::Error> {
        Ok(ledger.account(index)?.map(|a| a.balance).unwrap_or_default())
    };
    let summary = TransferSummary {
        sender_balance: balance(0)?,
        recipient_balance: balance(recipient)?,
        initial_root,
        final_root,
    };
    info!(
        target: LOG_TARGET,
        "Sender balance {}, recipient balance {}, root {}",
        summary.sender_balance,
        summary.recipient_balance,
        summary.final_root
    );
    Ok(summary)
}
