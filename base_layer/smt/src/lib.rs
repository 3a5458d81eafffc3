// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Fixed height sparse Merkle trees
//!
//! A tree of height `H` has `2^H` leaf slots addressed by index. Only slots that have been written are stored; every
//! other slot is an empty leaf whose node hash is the zero field element. Empty subtrees therefore have a known hash
//! at every level (`Z[0] = 0`, `Z[l + 1] = hash_node(Z[l], Z[l])`), and only non-empty nodes are kept in memory.
//!
//! Populated leaves hash as `hash_leaf(value)`, internal nodes as `hash_node(left, right)`. Both come from the same
//! [`FieldHasher`](ledger_hashing::FieldHasher), which is the only knob a caller can turn.
//!
//! Updating a leaf touches exactly the `H` ancestors on its path, and a [`MerkleWitness`] for a leaf is the `H` sibling
//! hashes on that same path together with the left/right position at each level.
//!
//! # Example
//!
//! ```rust
//! use ledger_common_types::FieldElement;
//! use ledger_hashing::LedgerHasher;
//! use ledger_smt::SparseMerkleTree;
//!
//! let mut tree = SparseMerkleTree::<LedgerHasher>::new(3).unwrap();
//! let empty_root = tree.root();
//! tree.set(5, FieldElement::from(42)).unwrap();
//! assert_ne!(tree.root(), empty_root);
//!
//! let witness = tree.witness(5).unwrap();
//! assert_eq!(witness.index(), 5);
//! assert!(witness.verify(&[FieldElement::from(42)], &tree.root()));
//! assert!(!witness.verify(&[FieldElement::from(41)], &tree.root()));
//!
//! tree.remove(5).unwrap();
//! assert_eq!(tree.root(), empty_root);
//! ```

mod bit_utils;
mod error;
mod proofs;
mod tree;

pub use bit_utils::TraverseDirection;
pub use error::SMTError;
pub use proofs::MerkleWitness;
pub use tree::{SparseMerkleTree, EMPTY_LEAF_HASH, MAX_TREE_HEIGHT};
