// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::ops::Not;

use ledger_common_types::{FieldElement, LeafIndex};
use ledger_hashing::FieldHasher;
use serde::{Deserialize, Serialize};

/// Gets the bit at an offset from the least significant bit of a leaf index. Does NOT perform range checking
#[inline]
pub(crate) const fn get_bit(index: LeafIndex, position: usize) -> u64 {
    (index >> position) & 1
}

pub const fn bit_to_dir(bit: u64) -> TraverseDirection {
    match bit {
        0 => TraverseDirection::Left,
        1 => TraverseDirection::Right,
        _ => panic!("Invalid bit"),
    }
}

/// Whether the node on a path is the left or the right child of its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraverseDirection {
    Left,
    Right,
}

impl Not for TraverseDirection {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            TraverseDirection::Left => TraverseDirection::Right,
            TraverseDirection::Right => TraverseDirection::Left,
        }
    }
}

/// The position of the path node at every level, leaf first. Bit `i` of the index is the direction at level `i`.
pub(crate) fn index_to_directions(index: LeafIndex, height: usize) -> Vec<TraverseDirection> {
    (0..height).map(|level| bit_to_dir(get_bit(index, level))).collect()
}

/// The inverse of [`index_to_directions`]
pub(crate) fn directions_to_index(directions: &[TraverseDirection]) -> LeafIndex {
    directions
        .iter()
        .enumerate()
        .fold(0, |index, (level, direction)| match direction {
            TraverseDirection::Left => index,
            TraverseDirection::Right => index | (1 << level),
        })
}

/// Computes the parent of `current` given its sibling and its position. This is the single combination rule used by
/// both the tree and the witness verifier.
#[inline]
pub(crate) fn hash_with_sibling<H: FieldHasher>(
    direction: TraverseDirection,
    current: &FieldElement,
    sibling: &FieldElement,
) -> FieldElement {
    match direction {
        TraverseDirection::Left => H::hash_node(current, sibling),
        TraverseDirection::Right => H::hash_node(sibling, current),
    }
}
