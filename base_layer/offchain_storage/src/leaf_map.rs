// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::collections::BTreeMap;

use ledger_common_types::{FieldElement, LeafIndex, LeafValue};
use ledger_hashing::LedgerHasher;
use ledger_smt::{SMTError, SparseMerkleTree};
use serde::{Deserialize, Serialize};

/// The full `{index -> value}` contents of a tree. Absent indices are empty leaves.
///
/// On the wire and on disk the map is an explicit list of `(index, fields)` pairs in index order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(LeafIndex, LeafValue)>", into = "Vec<(LeafIndex, LeafValue)>")]
pub struct LeafMap {
    leaves: BTreeMap<LeafIndex, LeafValue>,
}

impl LeafMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: &SparseMerkleTree) -> Self {
        tree.leaves().map(|(index, value)| (index, value.clone())).collect()
    }

    pub fn get(&self, index: LeafIndex) -> Option<&LeafValue> {
        self.leaves.get(&index)
    }

    pub fn contains(&self, index: LeafIndex) -> bool {
        self.leaves.contains_key(&index)
    }

    pub fn insert<V: Into<LeafValue>>(&mut self, index: LeafIndex, value: V) -> Option<LeafValue> {
        self.leaves.insert(index, value.into())
    }

    pub fn remove(&mut self, index: LeafIndex) -> Option<LeafValue> {
        self.leaves.remove(&index)
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LeafIndex, &LeafValue)> {
        self.leaves.iter().map(|(index, value)| (*index, value))
    }

    /// Builds the tree of the given height holding these leaves. Fails if an index does not fit the height.
    pub fn to_tree(&self, height: usize) -> Result<SparseMerkleTree, SMTError> {
        SparseMerkleTree::<LedgerHasher>::from_leaves(height, self.iter().map(|(index, value)| (index, value.clone())))
    }

    pub fn root(&self, height: usize) -> Result<FieldElement, SMTError> {
        Ok(self.to_tree(height)?.root())
    }
}

impl FromIterator<(LeafIndex, LeafValue)> for LeafMap {
    fn from_iter<T: IntoIterator<Item = (LeafIndex, LeafValue)>>(iter: T) -> Self {
        Self {
            leaves: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<(LeafIndex, LeafValue)>> for LeafMap {
    fn from(pairs: Vec<(LeafIndex, LeafValue)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<LeafMap> for Vec<(LeafIndex, LeafValue)> {
    fn from(map: LeafMap) -> Self {
        map.leaves.into_iter().collect()
    }
}
