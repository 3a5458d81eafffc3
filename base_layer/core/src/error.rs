// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::{FieldElement, LeafIndex};
use ledger_smt::SMTError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("The witness for leaf {index} computes root {computed_root}, but the committed root is {current_root}")]
    StaleWitness {
        index: LeafIndex,
        computed_root: FieldElement,
        current_root: FieldElement,
    },
    #[error("There is no account at leaf {index}")]
    UnknownSender { index: LeafIndex },
    #[error("The account at leaf {index} is not owned by the given key")]
    OwnerMismatch { index: LeafIndex },
    #[error("The transfer signature is not valid for the sender key and the current root")]
    BadSignature,
    #[error("Insufficient balance: {balance} available, {amount} requested")]
    InsufficientBalance { balance: FieldElement, amount: FieldElement },
    #[error("Crediting {amount} to a balance of {balance} overflows")]
    BalanceOverflow { balance: FieldElement, amount: FieldElement },
    #[error("Recipient precondition failed at leaf {index}: {reason}")]
    RecipientPreconditionFailed { index: LeafIndex, reason: &'static str },
    #[error("The leaf map hashes to {actual}, expected {expected}")]
    MapRootMismatch { expected: FieldElement, actual: FieldElement },
    #[error("Leaf index {index} is out of range for a tree with {capacity} leaves")]
    OutOfRange { index: LeafIndex, capacity: u64 },
    #[error("Counter must increase: prior value {prior}, new value {new}")]
    NonIncreasingValue { prior: FieldElement, new: FieldElement },
    #[error("An empty leaf has prior value zero, got {prior}")]
    InvalidPriorValue { prior: FieldElement },
    #[error("Leaf {index} does not hold an account: expected 2 fields, found {fields}")]
    MalformedLeaf { index: LeafIndex, fields: usize },
    #[error("Storage attestation rejected: {0}")]
    BadAttestation(&'static str),
    #[error("Storage attestation sequence {received} is not newer than {last}")]
    StaleAttestation { last: u64, received: u64 },
    #[error("Signing failed: {0}")]
    SigningFailed(String),
    #[error("The root commitment store has not been initialized")]
    NotInitialized,
    #[error("The root commitment store has already been initialized")]
    AlreadyInitialized,
    #[error("The root commitment store lock is poisoned: {0}")]
    PoisonedAccess(String),
    #[error("Tree error: {0}")]
    TreeError(SMTError),
}

impl TransitionError {
    /// Errors caused by a concurrent commit, which go away after refetching the leaf map and retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransitionError::StaleWitness { .. } | TransitionError::MapRootMismatch { .. }
        )
    }
}

impl From<SMTError> for TransitionError {
    fn from(err: SMTError) -> Self {
        match err {
            SMTError::IndexOutOfRange { index, capacity } => TransitionError::OutOfRange { index, capacity },
            e => TransitionError::TreeError(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn retryable_errors() {
        let stale = TransitionError::StaleWitness {
            index: 1,
            computed_root: FieldElement::ONE,
            current_root: FieldElement::ZERO,
        };
        assert!(stale.is_retryable());
        assert!(TransitionError::MapRootMismatch {
            expected: FieldElement::ONE,
            actual: FieldElement::ZERO
        }
        .is_retryable());
        assert!(!TransitionError::BadSignature.is_retryable());
        assert!(!TransitionError::InsufficientBalance {
            balance: FieldElement::ONE,
            amount: FieldElement::from(2)
        }
        .is_retryable());
        assert!(!TransitionError::OutOfRange { index: 9, capacity: 8 }.is_retryable());
    }

    #[test]
    fn index_errors_map_to_out_of_range() {
        let err = TransitionError::from(SMTError::IndexOutOfRange { index: 8, capacity: 8 });
        assert_eq!(err, TransitionError::OutOfRange { index: 8, capacity: 8 });
        let err = TransitionError::from(SMTError::InvalidHeight { height: 0, max: 63 });
        assert!(matches!(err, TransitionError::TreeError(_)));
    }
}
