// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::{FieldElement, LeafIndex, LeafValue};
use ledger_hashing::LedgerHasher;
use ledger_smt::SparseMerkleTree;

pub type TestTree = SparseMerkleTree<LedgerHasher>;

pub fn int_to_value(n: u64) -> LeafValue {
    LeafValue::from([FieldElement::from(n), FieldElement::from(n.wrapping_mul(31))])
}

/// Builds a tree of the given height with leaves at `indices`, each holding `int_to_value(index)`
pub fn create_tree(height: usize, indices: &[LeafIndex]) -> TestTree {
    TestTree::from_leaves(height, indices.iter().map(|i| (*i, int_to_value(*i)))).unwrap()
}
