// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::{FieldElement, LeafIndex};
use ledger_hashing::LedgerHasher;
use ledger_smt::SparseMerkleTree;
use log::*;
use tari_crypto::keys::PublicKey as _;

use crate::{
    transitions::transfer::sign_transfer,
    types::{PrivateKey, PublicKey},
    AccountLeaf,
    BalanceTransfer,
    TransitionError,
};

const LOG_TARGET: &str = "ledger::core::ledger";

/// A transfer ready to be submitted, together with the local tree as it will look once the transfer is committed.
#[derive(Clone, Debug)]
pub struct PreparedTransfer {
    pub transfer: BalanceTransfer,
    pub resulting_tree: SparseMerkleTree,
}

/// The client's full copy of the balance ledger. It builds [`BalanceTransfer`]s with all the values and witnesses the
/// anchor needs, and tracks the tree through accepted transfers.
#[derive(Clone, Debug)]
pub struct AccountLedger {
    tree: SparseMerkleTree,
}

impl AccountLedger {
    pub fn new(height: usize) -> Result<Self, TransitionError> {
        Ok(Self {
            tree: SparseMerkleTree::<LedgerHasher>::new(height)?,
        })
    }

    pub fn from_tree(tree: SparseMerkleTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &SparseMerkleTree {
        &self.tree
    }

    pub fn root(&self) -> FieldElement {
        self.tree.root()
    }

    pub fn account(&self, index: LeafIndex) -> Result<Option<AccountLeaf>, TransitionError> {
        self.tree
            .get(index)?
            .map(|value| AccountLeaf::from_leaf_value(index, value))
            .transpose()
    }

    /// Writes an account directly into the local tree, e.g. to build the genesis state before the anchor is
    /// initialized. Returns the new local root.
    pub fn open_account(
        &mut self,
        index: LeafIndex,
        owner: &PublicKey,
        balance: FieldElement,
    ) -> Result<FieldElement, TransitionError> {
        Ok(self.tree.set(index, AccountLeaf::new(balance, owner))?)
    }

    /// Builds a signed transfer of `amount` from the account at `sender_index` to the account (or empty slot) at
    /// `recipient_index`. The transfer is evaluated locally before it is returned, so a prepared transfer only fails
    /// at the anchor if the committed root has moved on.
    pub fn prepare_transfer(
        &self,
        sender_index: LeafIndex,
        sender_secret: &PrivateKey,
        recipient_index: LeafIndex,
        recipient_public_key: &PublicKey,
        amount: FieldElement,
    ) -> Result<PreparedTransfer, TransitionError> {
        let sender_public_key = PublicKey::from_secret_key(sender_secret);
        let sender = self
            .account(sender_index)?
            .ok_or(TransitionError::UnknownSender { index: sender_index })?;
        if !sender.is_owned_by(&sender_public_key) {
            return Err(TransitionError::OwnerMismatch { index: sender_index });
        }
        let debited = sender
            .balance
            .checked_sub(&amount)
            .ok_or(TransitionError::InsufficientBalance {
                balance: sender.balance,
                amount,
            })?;

        let root = self.tree.root();
        let sender_witness = self.tree.witness(sender_index)?;
        let mut resulting_tree = self.tree.clone();
        resulting_tree.set(sender_index, sender.with_balance(debited))?;

        let recipient_witness = resulting_tree.witness(recipient_index)?;
        let recipient_balance_before = match resulting_tree.get(recipient_index)? {
            Some(value) => {
                let recipient = AccountLeaf::from_leaf_value(recipient_index, value)?;
                if !recipient.is_owned_by(recipient_public_key) {
                    return Err(TransitionError::RecipientPreconditionFailed {
                        index: recipient_index,
                        reason: "the recipient account is owned by a different key",
                    });
                }
                recipient.balance
            },
            None => FieldElement::ZERO,
        };
        let credited = recipient_balance_before
            .checked_add(&amount)
            .ok_or(TransitionError::BalanceOverflow {
                balance: recipient_balance_before,
                amount,
            })?;
        let new_root = resulting_tree.set(recipient_index, AccountLeaf::new(credited, recipient_public_key))?;

        let transfer = BalanceTransfer {
            signature: sign_transfer(sender_secret, &root, &amount, recipient_public_key)?,
            sender_public_key,
            sender_balance_before: sender.balance,
            sender_witness,
            recipient_public_key: recipient_public_key.clone(),
            recipient_balance_before,
            recipient_witness,
            amount,
        };
        let outcome = transfer.evaluate(&root)?;
        debug_assert_eq!(outcome.new_root, new_root);
        debug!(
            target: LOG_TARGET,
            "Prepared transfer of {} from leaf {} to leaf {} against root {}", amount, sender_index, recipient_index, root
        );
        Ok(PreparedTransfer {
            transfer,
            resulting_tree,
        })
    }

    /// Adopts the tree of a transfer the anchor has accepted
    pub fn apply(&mut self, prepared: PreparedTransfer) {
        self.tree = prepared.resulting_tree;
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;
    use tari_crypto::keys::PublicKey as _;

    use super::*;

    #[test]
    fn prepare_checks_ownership_and_balance() {
        let (alice_secret, alice) = PublicKey::random_keypair(&mut OsRng);
        let (mallory_secret, _) = PublicKey::random_keypair(&mut OsRng);
        let (_, bob) = PublicKey::random_keypair(&mut OsRng);
        let mut ledger = AccountLedger::new(3).unwrap();
        ledger.open_account(1, &alice, FieldElement::from(10)).unwrap();

        assert_eq!(
            ledger
                .prepare_transfer(2, &alice_secret, 4, &bob, FieldElement::ONE)
                .unwrap_err(),
            TransitionError::UnknownSender { index: 2 }
        );
        assert_eq!(
            ledger
                .prepare_transfer(1, &mallory_secret, 4, &bob, FieldElement::ONE)
                .unwrap_err(),
            TransitionError::OwnerMismatch { index: 1 }
        );
        assert!(matches!(
            ledger.prepare_transfer(1, &alice_secret, 4, &bob, FieldElement::from(11)),
            Err(TransitionError::InsufficientBalance { .. })
        ));
        assert_eq!(
            ledger
                .prepare_transfer(1, &alice_secret, 8, &bob, FieldElement::ONE)
                .unwrap_err(),
            TransitionError::OutOfRange { index: 8, capacity: 8 }
        );
    }

    #[test]
    fn prepared_tree_reflects_the_transfer() {
        let (alice_secret, alice) = PublicKey::random_keypair(&mut OsRng);
        let (_, bob) = PublicKey::random_keypair(&mut OsRng);
        let mut ledger = AccountLedger::new(3).unwrap();
        ledger.open_account(1, &alice, FieldElement::from(10)).unwrap();
        let prepared = ledger
            .prepare_transfer(1, &alice_secret, 4, &bob, FieldElement::from(4))
            .unwrap();
        let expected_root = prepared.transfer.evaluate(&ledger.root()).unwrap().new_root;
        ledger.apply(prepared);
        assert_eq!(ledger.root(), expected_root);
        assert_eq!(ledger.account(1).unwrap().unwrap().balance, FieldElement::from(6));
        assert_eq!(ledger.account(4).unwrap().unwrap(), AccountLeaf::new(FieldElement::from(4), &bob));
    }

    #[test]
    fn existing_recipient_must_match_key() {
        let (alice_secret, alice) = PublicKey::random_keypair(&mut OsRng);
        let (_, bob) = PublicKey::random_keypair(&mut OsRng);
        let (_, carol) = PublicKey::random_keypair(&mut OsRng);
        let mut ledger = AccountLedger::new(3).unwrap();
        ledger.open_account(1, &alice, FieldElement::from(10)).unwrap();
        ledger.open_account(4, &carol, FieldElement::from(10)).unwrap();
        assert!(matches!(
            ledger.prepare_transfer(1, &alice_secret, 4, &bob, FieldElement::from(4)),
            Err(TransitionError::RecipientPreconditionFailed { index: 4, .. })
        ));
    }
}
