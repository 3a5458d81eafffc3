// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::{FieldElement, LeafIndex};
use ledger_core::TransitionError;
use ledger_smt::SMTError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OffchainStorageError {
    #[error("Transition error: {0}")]
    TransitionError(#[from] TransitionError),
    #[error("Invalid leaf map: {0}")]
    InvalidLeafMap(#[from] SMTError),
    #[error("No leaf map is stored for root {root} at height {height}")]
    UnknownRoot { root: FieldElement, height: usize },
    #[error("The counter at leaf {index} cannot be incremented any further")]
    CounterOverflow { index: LeafIndex },
    #[error("Giving up after {attempts} attempts, the last error was: {last_error}")]
    RetriesExhausted { attempts: usize, last_error: String },
    #[error("Snapshot error: {0}")]
    SnapshotError(String),
    /// A failure reported by the storage server or the transport to it
    #[error("Storage server error: {0}")]
    ServerError(String),
}

impl OffchainStorageError {
    /// True if the operation may succeed after refetching the current leaf map
    pub fn is_retryable(&self) -> bool {
        match self {
            OffchainStorageError::TransitionError(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for OffchainStorageError {
    fn from(err: std::io::Error) -> Self {
        OffchainStorageError::SnapshotError(err.to_string())
    }
}

impl From<serde_json::Error> for OffchainStorageError {
    fn from(err: serde_json::Error) -> Self {
        OffchainStorageError::SnapshotError(err.to_string())
    }
}
