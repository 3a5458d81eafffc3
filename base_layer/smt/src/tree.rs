// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    collections::{BTreeMap, HashMap},
    marker::PhantomData,
};

use ledger_common_types::{FieldElement, LeafIndex, LeafValue};
use ledger_hashing::{FieldHasher, LedgerHasher};

use crate::{
    bit_utils::{bit_to_dir, get_bit, hash_with_sibling, index_to_directions},
    MerkleWitness,
    SMTError,
};

/// The node hash of a leaf slot that has never been written (or has been removed).
pub const EMPTY_LEAF_HASH: FieldElement = FieldElement::ZERO;

/// Leaf indices are u64, so the largest tree has 2^63 slots.
pub const MAX_TREE_HEIGHT: usize = 63;

/// A sparse Merkle tree of fixed height.
///
/// `nodes[0]` holds leaf hashes and `nodes[height]` holds the root. A node is only stored if its hash differs from
/// the empty subtree hash for its level, so memory use grows with the number of populated leaves, not the capacity.
#[derive(Clone, Debug)]
pub struct SparseMerkleTree<H = LedgerHasher> {
    height: usize,
    nodes: Vec<HashMap<LeafIndex, FieldElement>>,
    values: BTreeMap<LeafIndex, LeafValue>,
    empty_hashes: Vec<FieldElement>,
    _hasher: PhantomData<H>,
}

impl<H: FieldHasher> SparseMerkleTree<H> {
    /// Creates an empty tree with `2^height` leaf slots.
    pub fn new(height: usize) -> Result<Self, SMTError> {
        if height == 0 || height > MAX_TREE_HEIGHT {
            return Err(SMTError::InvalidHeight {
                height,
                max: MAX_TREE_HEIGHT,
            });
        }
        let mut empty_hashes = Vec::with_capacity(height + 1);
        empty_hashes.push(EMPTY_LEAF_HASH);
        for level in 0..height {
            let below = empty_hashes[level];
            empty_hashes.push(H::hash_node(&below, &below));
        }
        Ok(Self {
            height,
            nodes: vec![HashMap::new(); height + 1],
            values: BTreeMap::new(),
            empty_hashes,
            _hasher: PhantomData,
        })
    }

    /// Builds a tree from an explicit `{index -> value}` mapping. The resulting root depends only on the mapping, not
    /// on the iteration order. If an index appears more than once, the last value wins.
    pub fn from_leaves<I, V>(height: usize, leaves: I) -> Result<Self, SMTError>
    where
        I: IntoIterator<Item = (LeafIndex, V)>,
        V: Into<LeafValue>,
    {
        let mut tree = Self::new(height)?;
        for (index, value) in leaves {
            tree.set(index, value)?;
        }
        Ok(tree)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The number of leaf slots, `2^height`
    pub fn capacity(&self) -> u64 {
        1u64 << self.height
    }

    /// The number of populated leaves
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn root(&self) -> FieldElement {
        self.node_hash(self.height, 0)
    }

    /// Returns the value at `index`, or `None` if the slot is empty.
    pub fn get(&self, index: LeafIndex) -> Result<Option<&LeafValue>, SMTError> {
        self.check_index(index)?;
        Ok(self.values.get(&index))
    }

    /// Returns the node hash of the leaf at `index`, which is [`EMPTY_LEAF_HASH`] for an empty slot.
    pub fn leaf_hash(&self, index: LeafIndex) -> Result<FieldElement, SMTError> {
        self.check_index(index)?;
        Ok(self.node_hash(0, index))
    }

    /// Iterates over the populated leaves in index order
    pub fn leaves(&self) -> impl Iterator<Item = (LeafIndex, &LeafValue)> {
        self.values.iter().map(|(index, value)| (*index, value))
    }

    /// Writes `value` into the slot at `index` and returns the new root. Only the ancestors of `index` are rehashed.
    pub fn set<V: Into<LeafValue>>(&mut self, index: LeafIndex, value: V) -> Result<FieldElement, SMTError> {
        self.check_index(index)?;
        let value = value.into();
        let leaf_hash = H::hash_leaf(&value);
        self.values.insert(index, value);
        Ok(self.update_path(index, leaf_hash))
    }

    /// Returns the slot at `index` to the empty state and returns the new root.
    pub fn remove(&mut self, index: LeafIndex) -> Result<FieldElement, SMTError> {
        self.check_index(index)?;
        self.values.remove(&index);
        Ok(self.update_path(index, EMPTY_LEAF_HASH))
    }

    /// Generates the inclusion witness for the slot at `index`, whether it is populated or not.
    pub fn witness(&self, index: LeafIndex) -> Result<MerkleWitness<H>, SMTError> {
        self.check_index(index)?;
        let siblings = (0..self.height)
            .map(|level| self.node_hash(level, (index >> level) ^ 1))
            .collect();
        MerkleWitness::new(siblings, index_to_directions(index, self.height))
    }

    fn check_index(&self, index: LeafIndex) -> Result<(), SMTError> {
        if index >= self.capacity() {
            return Err(SMTError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    fn node_hash(&self, level: usize, position: u64) -> FieldElement {
        self.nodes[level]
            .get(&position)
            .copied()
            .unwrap_or(self.empty_hashes[level])
    }

    fn store_node(&mut self, level: usize, position: u64, hash: FieldElement) {
        if hash == self.empty_hashes[level] {
            self.nodes[level].remove(&position);
        } else {
            self.nodes[level].insert(position, hash);
        }
    }

    fn update_path(&mut self, index: LeafIndex, leaf_hash: FieldElement) -> FieldElement {
        let mut position = index;
        let mut hash = leaf_hash;
        self.store_node(0, position, hash);
        for level in 0..self.height {
            let sibling = self.node_hash(level, position ^ 1);
            hash = hash_with_sibling::<H>(bit_to_dir(get_bit(position, 0)), &hash, &sibling);
            position >>= 1;
            self.store_node(level + 1, position, hash);
        }
        hash
    }
}
