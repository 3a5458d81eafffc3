// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! State transition functions. Each one takes the committed root and the caller's claims (prior leaf values,
//! witnesses and authorization), checks every claim against that root, and returns the new root. None of them have
//! side effects; committing the result is up to the caller.

pub mod counter;
pub mod transfer;

use ledger_common_types::{FieldElement, LeafValue};
use ledger_hashing::{FieldHasher, LedgerHasher};
use ledger_smt::MerkleWitness;

use crate::TransitionError;

/// Checks that `witness` places `leaf_hash` under `current_root`, reporting the root it does imply otherwise.
pub(crate) fn authenticate(
    witness: &MerkleWitness,
    leaf_hash: &FieldElement,
    current_root: &FieldElement,
) -> Result<(), TransitionError> {
    let computed_root = witness.calculate_root(leaf_hash);
    if computed_root != *current_root {
        return Err(TransitionError::StaleWitness {
            index: witness.index(),
            computed_root,
            current_root: *current_root,
        });
    }
    Ok(())
}

pub(crate) fn leaf_hash(value: &LeafValue) -> FieldElement {
    LedgerHasher::hash_leaf(value)
}
