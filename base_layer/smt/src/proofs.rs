// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::marker::PhantomData;

use ledger_common_types::{FieldElement, LeafIndex};
use ledger_hashing::{FieldHasher, LedgerHasher};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    bit_utils::{directions_to_index, hash_with_sibling, TraverseDirection},
    SMTError,
    EMPTY_LEAF_HASH,
    MAX_TREE_HEIGHT,
};

/// An inclusion witness for one leaf slot of a [`SparseMerkleTree`](crate::SparseMerkleTree).
///
/// The witness holds the sibling hash and the position of the path node at every level, ordered from the leaf up to
/// (but excluding) the root. It is derived from a snapshot of the tree and is only valid for the root of that
/// snapshot. Since sibling hashes do not change when the leaf itself is replaced, the same witness can compute the
/// root that results from writing a new value into its slot:
///
/// ```
/// # use ledger_common_types::FieldElement;
/// # use ledger_hashing::{FieldHasher, LedgerHasher};
/// # use ledger_smt::SparseMerkleTree;
/// let mut tree = SparseMerkleTree::<LedgerHasher>::new(4).unwrap();
/// tree.set(3, FieldElement::from(10)).unwrap();
/// let witness = tree.witness(3).unwrap();
///
/// let predicted = witness.calculate_root(&LedgerHasher::hash_leaf(&[FieldElement::from(11)]));
/// tree.set(3, FieldElement::from(11)).unwrap();
/// assert_eq!(predicted, tree.root());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MerkleWitness<H = LedgerHasher> {
    siblings: Vec<FieldElement>,
    path: Vec<TraverseDirection>,
    #[serde(skip)]
    _hasher: PhantomData<H>,
}

impl<H: FieldHasher> MerkleWitness<H> {
    /// Construct a witness from its parts. Usually you will not use this method, but will generate the witness using
    /// [`SparseMerkleTree::witness`](crate::SparseMerkleTree::witness) instead.
    ///
    /// The witness must span between 1 and [`MAX_TREE_HEIGHT`] levels, with one direction per sibling.
    pub fn new(siblings: Vec<FieldElement>, path: Vec<TraverseDirection>) -> Result<Self, SMTError> {
        if siblings.len() != path.len() {
            return Err(SMTError::MalformedWitness {
                siblings: siblings.len(),
                directions: path.len(),
            });
        }
        if path.is_empty() || path.len() > MAX_TREE_HEIGHT {
            return Err(SMTError::InvalidHeight {
                height: path.len(),
                max: MAX_TREE_HEIGHT,
            });
        }
        Ok(Self {
            siblings,
            path,
            _hasher: PhantomData,
        })
    }

    /// The number of levels this witness spans, i.e. the height of the tree it came from
    pub fn height(&self) -> usize {
        self.siblings.len()
    }

    pub fn siblings(&self) -> &[FieldElement] {
        &self.siblings
    }

    pub fn path(&self) -> &[TraverseDirection] {
        &self.path
    }

    /// The leaf index this witness authenticates, recovered from the path bits
    pub fn index(&self) -> LeafIndex {
        directions_to_index(&self.path)
    }

    /// Fails with [`SMTError::WitnessHeightMismatch`] unless this witness spans exactly `height` levels.
    pub fn check_height(&self, height: usize) -> Result<(), SMTError> {
        if self.height() != height {
            return Err(SMTError::WitnessHeightMismatch {
                expected: height,
                actual: self.height(),
            });
        }
        Ok(())
    }

    /// Folds the sibling hashes onto `leaf_hash`, producing the root this witness implies for that leaf.
    pub fn calculate_root(&self, leaf_hash: &FieldElement) -> FieldElement {
        self.siblings
            .iter()
            .zip(self.path.iter())
            .fold(*leaf_hash, |current, (sibling, direction)| {
                hash_with_sibling::<H>(*direction, &current, sibling)
            })
    }

    /// Validates that `claimed_value` occupies this witness' slot in the tree with root `claimed_root`.
    #[must_use = "Must use the result of the witness verification"]
    pub fn verify(&self, claimed_value: &[FieldElement], claimed_root: &FieldElement) -> bool {
        self.verify_leaf_hash(&H::hash_leaf(claimed_value), claimed_root)
    }

    /// Validates a raw leaf hash against `claimed_root`
    #[must_use = "Must use the result of the witness verification"]
    pub fn verify_leaf_hash(&self, leaf_hash: &FieldElement, claimed_root: &FieldElement) -> bool {
        self.calculate_root(leaf_hash) == *claimed_root
    }

    /// Validates that this witness' slot is empty in the tree with root `claimed_root`.
    #[must_use = "Must use the result of the witness verification"]
    pub fn verify_empty(&self, claimed_root: &FieldElement) -> bool {
        self.verify_leaf_hash(&EMPTY_LEAF_HASH, claimed_root)
    }
}

#[derive(Deserialize)]
struct WitnessParts {
    siblings: Vec<FieldElement>,
    path: Vec<TraverseDirection>,
}

// Decoded witnesses go through the same checks as `MerkleWitness::new`
impl<'de, H: FieldHasher> Deserialize<'de> for MerkleWitness<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        let parts = WitnessParts::deserialize(deserializer)?;
        Self::new(parts.siblings, parts.path).map_err(serde::de::Error::custom)
    }
}
