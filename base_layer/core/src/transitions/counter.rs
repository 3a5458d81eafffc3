// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::{FieldElement, LeafIndex, LeafValue};
use ledger_smt::{MerkleWitness, EMPTY_LEAF_HASH};
use serde::{Deserialize, Serialize};

use super::{authenticate, leaf_hash};
use crate::TransitionError;

/// Replaces the single-field counter at one leaf with a larger value.
///
/// An empty leaf counts as a prior value of zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterUpdate {
    pub witness: MerkleWitness,
    pub leaf_is_empty: bool,
    pub prior_value: FieldElement,
    pub new_value: FieldElement,
}

impl CounterUpdate {
    /// The value a client writes next: `prior + increment`, or one if the leaf is empty.
    pub fn next_value(prior: Option<FieldElement>, increment: u64) -> Option<FieldElement> {
        match prior {
            None => Some(FieldElement::ONE),
            Some(prior) => prior.checked_add(&FieldElement::from(increment)),
        }
    }

    /// Reads the counter stored at `index`. A counter leaf holds exactly one field.
    pub fn counter_value(index: LeafIndex, value: &LeafValue) -> Result<FieldElement, TransitionError> {
        match value.fields() {
            [counter] => Ok(*counter),
            fields => Err(TransitionError::MalformedLeaf {
                index,
                fields: fields.len(),
            }),
        }
    }

    pub fn index(&self) -> LeafIndex {
        self.witness.index()
    }

    /// Returns the root after the update, if the witness authenticates the prior value under `current_root`.
    pub fn evaluate(&self, current_root: &FieldElement) -> Result<FieldElement, TransitionError> {
        let prior_hash = if self.leaf_is_empty {
            if !self.prior_value.is_zero() {
                return Err(TransitionError::InvalidPriorValue {
                    prior: self.prior_value,
                });
            }
            EMPTY_LEAF_HASH
        } else {
            leaf_hash(&LeafValue::from(self.prior_value))
        };
        authenticate(&self.witness, &prior_hash, current_root)?;

        if self.new_value <= self.prior_value {
            return Err(TransitionError::NonIncreasingValue {
                prior: self.prior_value,
                new: self.new_value,
            });
        }
        Ok(self
            .witness
            .calculate_root(&leaf_hash(&LeafValue::from(self.new_value))))
    }
}

#[cfg(test)]
mod test {
    use ledger_hashing::LedgerHasher;
    use ledger_smt::SparseMerkleTree;

    use super::*;

    fn tree() -> SparseMerkleTree {
        let mut tree = SparseMerkleTree::<LedgerHasher>::new(3).unwrap();
        tree.set(2, FieldElement::from(4)).unwrap();
        tree
    }

    #[test]
    fn next_value_policy() {
        assert_eq!(CounterUpdate::next_value(None, 3), Some(FieldElement::ONE));
        assert_eq!(
            CounterUpdate::next_value(Some(FieldElement::from(4)), 3),
            Some(FieldElement::from(7))
        );
    }

    #[test]
    fn counter_leaves_hold_one_field() {
        let value = LeafValue::from(FieldElement::from(4));
        assert_eq!(CounterUpdate::counter_value(2, &value), Ok(FieldElement::from(4)));
        let pair = LeafValue::from(vec![FieldElement::from(5), FieldElement::from(9)]);
        let err = CounterUpdate::counter_value(0, &pair).unwrap_err();
        assert_eq!(err, TransitionError::MalformedLeaf { index: 0, fields: 2 });
        assert!(!err.is_retryable());
        assert_eq!(
            CounterUpdate::counter_value(1, &LeafValue::from(vec![])),
            Err(TransitionError::MalformedLeaf { index: 1, fields: 0 })
        );
    }

    #[test]
    fn update_existing_leaf() {
        let mut tree = tree();
        let update = CounterUpdate {
            witness: tree.witness(2).unwrap(),
            leaf_is_empty: false,
            prior_value: FieldElement::from(4),
            new_value: FieldElement::from(7),
        };
        let new_root = update.evaluate(&tree.root()).unwrap();
        assert_eq!(tree.set(2, FieldElement::from(7)).unwrap(), new_root);
    }

    #[test]
    fn update_empty_leaf() {
        let mut tree = tree();
        let update = CounterUpdate {
            witness: tree.witness(5).unwrap(),
            leaf_is_empty: true,
            prior_value: FieldElement::ZERO,
            new_value: FieldElement::ONE,
        };
        let new_root = update.evaluate(&tree.root()).unwrap();
        assert_eq!(tree.set(5, FieldElement::ONE).unwrap(), new_root);
    }

    #[test]
    fn counter_must_grow() {
        let tree = tree();
        let update = CounterUpdate {
            witness: tree.witness(2).unwrap(),
            leaf_is_empty: false,
            prior_value: FieldElement::from(4),
            new_value: FieldElement::from(4),
        };
        assert_eq!(
            update.evaluate(&tree.root()),
            Err(TransitionError::NonIncreasingValue {
                prior: FieldElement::from(4),
                new: FieldElement::from(4)
            })
        );
    }

    #[test]
    fn empty_leaf_has_zero_prior() {
        let tree = tree();
        let update = CounterUpdate {
            witness: tree.witness(5).unwrap(),
            leaf_is_empty: true,
            prior_value: FieldElement::ONE,
            new_value: FieldElement::from(2),
        };
        assert_eq!(
            update.evaluate(&tree.root()),
            Err(TransitionError::InvalidPriorValue { prior: FieldElement::ONE })
        );
    }

    #[test]
    fn wrong_prior_is_a_stale_witness() {
        let tree = tree();
        // Claims leaf 2 is empty
        let update = CounterUpdate {
            witness: tree.witness(2).unwrap(),
            leaf_is_empty: true,
            prior_value: FieldElement::ZERO,
            new_value: FieldElement::ONE,
        };
        let err = update.evaluate(&tree.root()).unwrap_err();
        assert!(matches!(err, TransitionError::StaleWitness { index: 2, .. }));
        assert!(err.is_retryable());
    }
}
