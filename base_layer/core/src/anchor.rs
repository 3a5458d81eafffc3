// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::FieldElement;
use ledger_smt::MerkleWitness;
use log::*;

use crate::{
    types::PublicKey,
    BalanceTransfer,
    CounterUpdate,
    RootCommitmentStore,
    StorageAttestation,
    TransitionError,
};

const LOG_TARGET: &str = "ledger::core::anchor";

/// The trust anchor of the balance ledger. It only knows the tree height and the committed root; clients bring the
/// account values and witnesses with every transfer.
#[derive(Debug)]
pub struct LedgerAnchor {
    tree_height: usize,
    store: RootCommitmentStore,
}

impl LedgerAnchor {
    pub fn new(tree_height: usize) -> Self {
        Self {
            tree_height,
            store: RootCommitmentStore::new(),
        }
    }

    pub fn tree_height(&self) -> usize {
        self.tree_height
    }

    pub fn init(&self, initial_root: FieldElement) -> Result<(), TransitionError> {
        self.store.init(initial_root, ())
    }

    pub fn root(&self) -> Result<FieldElement, TransitionError> {
        self.store.root()
    }

    /// Applies `transfer` to the committed root, returning the new root. On any failure the committed root is
    /// unchanged.
    pub fn transfer(&self, transfer: &BalanceTransfer) -> Result<FieldElement, TransitionError> {
        let result = check_witness_height(&transfer.sender_witness, self.tree_height)
            .and_then(|_| check_witness_height(&transfer.recipient_witness, self.tree_height))
            .and_then(|_| {
                self.store
                    .transition(|root, _| transfer.evaluate(root).map(|outcome| (outcome.new_root, ())))
            });
        match &result {
            Ok(root) => info!(
                target: LOG_TARGET,
                "Transferred {} from leaf {} to leaf {}, new root {}",
                transfer.amount,
                transfer.sender_index(),
                transfer.recipient_index(),
                root
            ),
            Err(e) => warn!(target: LOG_TARGET, "Transfer rejected: {}", e),
        }
        result
    }
}

/// The trust anchor of a counter tree whose leaf map is kept by an off-chain storage server.
///
/// Besides the counter transition itself, every update must carry the server's attestation that it has stored the
/// resulting leaf map. Attestation sequence numbers must strictly increase, so an old attestation cannot be replayed.
#[derive(Debug)]
pub struct CounterAnchor {
    server_key: PublicKey,
    tree_height: usize,
    store: RootCommitmentStore<u64>,
}

impl CounterAnchor {
    pub fn new(server_key: PublicKey, tree_height: usize) -> Self {
        Self {
            server_key,
            tree_height,
            store: RootCommitmentStore::new(),
        }
    }

    pub fn tree_height(&self) -> usize {
        self.tree_height
    }

    pub fn server_key(&self) -> &PublicKey {
        &self.server_key
    }

    pub fn init(&self, initial_root: FieldElement) -> Result<(), TransitionError> {
        self.store.init(initial_root, 0)
    }

    pub fn root(&self) -> Result<FieldElement, TransitionError> {
        self.store.root()
    }

    /// The sequence number of the last accepted attestation, zero before the first update
    pub fn last_sequence(&self) -> Result<u64, TransitionError> {
        self.store.state()
    }

    pub fn update(&self, update: &CounterUpdate, attestation: &StorageAttestation) -> Result<FieldElement, TransitionError> {
        if let Err(e) = check_witness_height(&update.witness, self.tree_height) {
            warn!(target: LOG_TARGET, "Counter update rejected: {}", e);
            return Err(e);
        }
        let result = self.store.transition(|root, last_sequence| {
            let new_root = update.evaluate(root)?;
            if attestation.root != new_root {
                return Err(TransitionError::BadAttestation("the attested root is not the updated root"));
            }
            if attestation.sequence <= *last_sequence {
                return Err(TransitionError::StaleAttestation {
                    last: *last_sequence,
                    received: attestation.sequence,
                });
            }
            if !attestation.verify(&self.server_key) {
                return Err(TransitionError::BadAttestation("invalid server signature"));
            }
            Ok((new_root, attestation.sequence))
        });
        match &result {
            Ok(root) => info!(
                target: LOG_TARGET,
                "Counter at leaf {} set to {} (attestation #{}), new root {}",
                update.index(),
                update.new_value,
                attestation.sequence,
                root
            ),
            Err(e) => warn!(target: LOG_TARGET, "Counter update rejected: {}", e),
        }
        result
    }
}

/// Rejects a witness that does not span exactly `tree_height` levels
fn check_witness_height(witness: &MerkleWitness, tree_height: usize) -> Result<(), TransitionError> {
    Ok(witness.check_height(tree_height)?)
}
