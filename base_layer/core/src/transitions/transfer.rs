// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use blake2::Blake2b;
use digest::consts::U32;
use ledger_common_types::{FieldElement, LeafIndex};
use ledger_hashing::{DomainSeparatedBorshHasher, TransferSignatureDomain};
use ledger_smt::MerkleWitness;
use log::*;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use super::authenticate;
use crate::{
    account::owner_key_hash,
    types::{PrivateKey, PublicKey, TransferSignature},
    AccountLeaf,
    TransitionError,
};

const LOG_TARGET: &str = "ledger::core::transitions::transfer";

/// The message a sender signs to authorize a transfer. It includes the root the transfer was built against, so a
/// signature cannot be replayed once the ledger has moved on.
pub fn transfer_message(root: &FieldElement, amount: &FieldElement, recipient: &PublicKey) -> [u8; 32] {
    let hash = DomainSeparatedBorshHasher::<TransferSignatureDomain, Blake2b<U32>>::new_with_label("transfer")
        .chain(root)
        .chain(amount)
        .chain(recipient)
        .finalize();
    let mut message = [0u8; 32];
    message.copy_from_slice(hash.as_slice());
    message
}

pub fn sign_transfer(
    sender_secret: &PrivateKey,
    root: &FieldElement,
    amount: &FieldElement,
    recipient: &PublicKey,
) -> Result<TransferSignature, TransitionError> {
    TransferSignature::sign(sender_secret, transfer_message(root, amount, recipient), &mut OsRng)
        .map_err(|e| TransitionError::SigningFailed(e.to_string()))
}

/// Moves `amount` from the sender's account leaf to the recipient's, creating the recipient account if its leaf is
/// empty.
///
/// The recipient witness (and the recipient's prior balance) must be taken from the tree *after* the sender has been
/// debited, since the sender's leaf is on the recipient's authentication path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTransfer {
    pub sender_public_key: PublicKey,
    pub sender_balance_before: FieldElement,
    pub sender_witness: MerkleWitness,
    pub recipient_public_key: PublicKey,
    pub recipient_balance_before: FieldElement,
    pub recipient_witness: MerkleWitness,
    pub amount: FieldElement,
    pub signature: TransferSignature,
}

/// The roots a successful transfer passes through
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferOutcome {
    pub root_after_sender: FieldElement,
    pub new_root: FieldElement,
    pub recipient_is_new: bool,
}

impl BalanceTransfer {
    pub fn sender_index(&self) -> LeafIndex {
        self.sender_witness.index()
    }

    pub fn recipient_index(&self) -> LeafIndex {
        self.recipient_witness.index()
    }

    /// Checks the transfer against `current_root` and computes the resulting root. All checks run before any root is
    /// produced, so a failure leaves nothing to undo.
    pub fn evaluate(&self, current_root: &FieldElement) -> Result<TransferOutcome, TransitionError> {
        // Both legs walk the same tree
        self.recipient_witness.check_height(self.sender_witness.height())?;
        let message = transfer_message(current_root, &self.amount, &self.recipient_public_key);
        if !self.signature.verify(&self.sender_public_key, message) {
            return Err(TransitionError::BadSignature);
        }

        let sender = AccountLeaf {
            balance: self.sender_balance_before,
            owner_key_hash: owner_key_hash(&self.sender_public_key),
        };
        if let Err(e) = authenticate(&self.sender_witness, &sender.leaf_hash(), current_root) {
            if self.sender_witness.verify_empty(current_root) {
                return Err(TransitionError::UnknownSender {
                    index: self.sender_index(),
                });
            }
            return Err(e);
        }

        let debited = self
            .sender_balance_before
            .checked_sub(&self.amount)
            .ok_or(TransitionError::InsufficientBalance {
                balance: self.sender_balance_before,
                amount: self.amount,
            })?;
        let root_after_sender = self
            .sender_witness
            .calculate_root(&sender.with_balance(debited).leaf_hash());

        let recipient = AccountLeaf {
            balance: self.recipient_balance_before,
            owner_key_hash: owner_key_hash(&self.recipient_public_key),
        };
        let recipient_is_new = self.recipient_witness.verify_empty(&root_after_sender);
        if recipient_is_new {
            if !self.recipient_balance_before.is_zero() {
                return Err(TransitionError::RecipientPreconditionFailed {
                    index: self.recipient_index(),
                    reason: "a new account must start from a zero balance",
                });
            }
        } else if !self
            .recipient_witness
            .verify_leaf_hash(&recipient.leaf_hash(), &root_after_sender)
        {
            return Err(TransitionError::RecipientPreconditionFailed {
                index: self.recipient_index(),
                reason: "the recipient witness does not authenticate the claimed account",
            });
        }

        let credited = self
            .recipient_balance_before
            .checked_add(&self.amount)
            .ok_or(TransitionError::BalanceOverflow {
                balance: self.recipient_balance_before,
                amount: self.amount,
            })?;
        let new_root = self
            .recipient_witness
            .calculate_root(&recipient.with_balance(credited).leaf_hash());

        trace!(
            target: LOG_TARGET,
            "Transfer of {} from leaf {} to {} leaf {} evaluated",
            self.amount,
            self.sender_index(),
            if recipient_is_new { "new" } else { "existing" },
            self.recipient_index()
        );
        Ok(TransferOutcome {
            root_after_sender,
            new_root,
            recipient_is_new,
        })
    }
}

#[cfg(test)]
mod test {
    use ledger_hashing::LedgerHasher;
    use ledger_smt::{SMTError, SparseMerkleTree};
    use tari_crypto::keys::PublicKey as _;

    use super::*;

    struct Fixture {
        tree: SparseMerkleTree,
        sender_secret: PrivateKey,
        sender: PublicKey,
        recipient: PublicKey,
    }

    fn fixture() -> Fixture {
        let (sender_secret, sender) = PublicKey::random_keypair(&mut OsRng);
        let (_, recipient) = PublicKey::random_keypair(&mut OsRng);
        let mut tree = SparseMerkleTree::<LedgerHasher>::new(3).unwrap();
        tree.set(0, AccountLeaf::new(FieldElement::from(100), &sender)).unwrap();
        Fixture {
            tree,
            sender_secret,
            sender,
            recipient,
        }
    }

    fn transfer(f: &Fixture, recipient_index: LeafIndex, amount: u64) -> BalanceTransfer {
        let amount = FieldElement::from(amount);
        let mut after = f.tree.clone();
        let debited = FieldElement::from(100).checked_sub(&amount).unwrap_or_default();
        after.set(0, AccountLeaf::new(debited, &f.sender)).unwrap();
        BalanceTransfer {
            sender_public_key: f.sender.clone(),
            sender_balance_before: FieldElement::from(100),
            sender_witness: f.tree.witness(0).unwrap(),
            recipient_public_key: f.recipient.clone(),
            recipient_balance_before: FieldElement::ZERO,
            recipient_witness: after.witness(recipient_index).unwrap(),
            amount,
            signature: sign_transfer(&f.sender_secret, &f.tree.root(), &amount, &f.recipient).unwrap(),
        }
    }

    #[test]
    fn transfer_to_new_account() {
        let f = fixture();
        let outcome = transfer(&f, 5, 30).evaluate(&f.tree.root()).unwrap();
        assert!(outcome.recipient_is_new);

        let mut expected = f.tree.clone();
        let after_sender = expected.set(0, AccountLeaf::new(FieldElement::from(70), &f.sender)).unwrap();
        let final_root = expected.set(5, AccountLeaf::new(FieldElement::from(30), &f.recipient)).unwrap();
        assert_eq!(outcome.root_after_sender, after_sender);
        assert_eq!(outcome.new_root, final_root);
    }

    #[test]
    fn both_witnesses_share_a_height() {
        let f = fixture();
        let mut t = transfer(&f, 5, 30);
        t.recipient_witness = SparseMerkleTree::<LedgerHasher>::new(4).unwrap().witness(5).unwrap();
        assert_eq!(
            t.evaluate(&f.tree.root()),
            Err(TransitionError::TreeError(SMTError::WitnessHeightMismatch {
                expected: 3,
                actual: 4
            }))
        );
    }

    #[test]
    fn signature_is_bound_to_the_root() {
        let f = fixture();
        let mut t = transfer(&f, 5, 30);
        t.signature = sign_transfer(&f.sender_secret, &FieldElement::ONE, &t.amount, &f.recipient).unwrap();
        assert_eq!(t.evaluate(&f.tree.root()), Err(TransitionError::BadSignature));
    }

    #[test]
    fn signature_covers_amount_and_recipient() {
        let f = fixture();
        let mut t = transfer(&f, 5, 30);
        t.amount = FieldElement::from(31);
        assert_eq!(t.evaluate(&f.tree.root()), Err(TransitionError::BadSignature));
        let mut t = transfer(&f, 5, 30);
        let (_, thief) = PublicKey::random_keypair(&mut OsRng);
        t.recipient_public_key = thief;
        assert_eq!(t.evaluate(&f.tree.root()), Err(TransitionError::BadSignature));
    }

    #[test]
    fn sender_slot_is_empty() {
        let f = fixture();
        let mut t = transfer(&f, 5, 30);
        t.sender_witness = f.tree.witness(3).unwrap();
        assert_eq!(
            t.evaluate(&f.tree.root()),
            Err(TransitionError::UnknownSender { index: 3 })
        );
    }

    #[test]
    fn wrong_sender_balance_is_stale() {
        let f = fixture();
        let mut t = transfer(&f, 5, 30);
        t.sender_balance_before = FieldElement::from(1000);
        let err = t.evaluate(&f.tree.root()).unwrap_err();
        assert!(matches!(err, TransitionError::StaleWitness { index: 0, .. }));
    }

    #[test]
    fn insufficient_balance() {
        let f = fixture();
        assert_eq!(
            transfer(&f, 5, 101).evaluate(&f.tree.root()),
            Err(TransitionError::InsufficientBalance {
                balance: FieldElement::from(100),
                amount: FieldElement::from(101)
            })
        );
    }

    #[test]
    fn new_account_must_start_at_zero() {
        let f = fixture();
        let mut t = transfer(&f, 5, 30);
        t.recipient_balance_before = FieldElement::from(1);
        assert!(matches!(
            t.evaluate(&f.tree.root()),
            Err(TransitionError::RecipientPreconditionFailed { index: 5, .. })
        ));
    }

    #[test]
    fn recipient_witness_must_come_from_the_debited_tree() {
        let f = fixture();
        let mut t = transfer(&f, 5, 30);
        // Siblings taken before the debit include the sender's old leaf
        t.recipient_witness = f.tree.witness(5).unwrap();
        assert!(matches!(
            t.evaluate(&f.tree.root()),
            Err(TransitionError::RecipientPreconditionFailed { index: 5, .. })
        ));
    }
}
