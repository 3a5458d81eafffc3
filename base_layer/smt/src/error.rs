// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SMTError {
    #[error("Leaf index {index} is out of range for a tree with {capacity} leaves")]
    IndexOutOfRange { index: u64, capacity: u64 },
    #[error("Tree height {height} is not supported. The height must be between 1 and {max}")]
    InvalidHeight { height: usize, max: usize },
    #[error("Malformed witness: {siblings} sibling hashes but {directions} path bits")]
    MalformedWitness { siblings: usize, directions: usize },
    #[error("Witness height {actual} does not match the tree height {expected}")]
    WitnessHeightMismatch { expected: usize, actual: usize },
}
