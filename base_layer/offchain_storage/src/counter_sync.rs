// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::sync::Arc;

use ledger_common_types::{FieldElement, LeafIndex, LeafValue};
use ledger_core::{CounterAnchor, CounterUpdate, StorageAttestation};
use log::*;

use crate::{LeafMap, OffchainStorageClient, OffchainStorageConfig, OffchainStorageError, StorageServer};

const LOG_TARGET: &str = "ledger::offchain_storage::counter_sync";

/// A counter update whose new leaf map is already stored, waiting to be submitted to the anchor
#[derive(Clone, Debug)]
pub struct PendingCounterUpdate {
    pub update: CounterUpdate,
    pub attestation: StorageAttestation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterSyncOutcome {
    pub index: LeafIndex,
    /// `None` if the leaf was empty
    pub prior_value: Option<FieldElement>,
    pub new_value: FieldElement,
    pub new_root: FieldElement,
    pub attempts: usize,
}

/// Increments counters in a tree whose root is held by a [`CounterAnchor`] and whose leaves are held by a storage
/// server.
pub struct CounterSyncClient<S> {
    storage: OffchainStorageClient<S>,
    anchor: Arc<CounterAnchor>,
    config: OffchainStorageConfig,
}

impl<S: StorageServer> CounterSyncClient<S> {
    pub fn new(storage: OffchainStorageClient<S>, anchor: Arc<CounterAnchor>, config: OffchainStorageConfig) -> Self {
        Self {
            storage,
            anchor,
            config,
        }
    }

    pub fn storage(&self) -> &OffchainStorageClient<S> {
        &self.storage
    }

    /// Fetches the leaf map for the committed root
    pub async fn current_leaves(&self) -> Result<LeafMap, OffchainStorageError> {
        let root = self.anchor.root()?;
        self.storage.fetch(root, self.config.tree_height).await
    }

    /// Fetches the current map, bumps the counter at `index` and stores the new map. Nothing is committed yet.
    pub async fn prepare(&self, index: LeafIndex) -> Result<PendingCounterUpdate, OffchainStorageError> {
        let height = self.config.tree_height;
        let root = self.anchor.root()?;
        let mut leaves = self.storage.fetch(root, height).await?;
        let witness = leaves.to_tree(height)?.witness(index)?;

        let prior = leaves
            .get(index)
            .map(|value| CounterUpdate::counter_value(index, value))
            .transpose()?;
        let new_value = CounterUpdate::next_value(prior, self.config.counter_increment)
            .ok_or(OffchainStorageError::CounterOverflow { index })?;
        leaves.insert(index, LeafValue::from(new_value));
        let attestation = self.storage.store(height, leaves).await?;

        Ok(PendingCounterUpdate {
            update: CounterUpdate {
                witness,
                leaf_is_empty: prior.is_none(),
                prior_value: prior.unwrap_or_default(),
                new_value,
            },
            attestation,
        })
    }

    pub fn submit(&self, pending: &PendingCounterUpdate) -> Result<FieldElement, OffchainStorageError> {
        Ok(self.anchor.update(&pending.update, &pending.attestation)?)
    }

    /// Runs prepare and submit until the update is committed. Losing a race to another client (a stale witness or a
    /// map that no longer matches the root) restarts from a fresh fetch, up to `max_retries` times.
    pub async fn update(&self, index: LeafIndex) -> Result<CounterSyncOutcome, OffchainStorageError> {
        let max_attempts = self.config.max_retries + 1;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = match self.prepare(index).await {
                Ok(pending) => self.submit(&pending).map(|new_root| (pending, new_root)),
                Err(e) => Err(e),
            };
            match result {
                Ok((pending, new_root)) => {
                    let update = pending.update;
                    info!(
                        target: LOG_TARGET,
                        "Counter at leaf {} is now {} (attempt {})", index, update.new_value, attempt
                    );
                    return Ok(CounterSyncOutcome {
                        index,
                        prior_value: if update.leaf_is_empty {
                            None
                        } else {
                            Some(update.prior_value)
                        },
                        new_value: update.new_value,
                        new_root,
                        attempts: attempt,
                    });
                },
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        target: LOG_TARGET,
                        "Counter update at leaf {} lost a race ({}), retrying", index, e
                    );
                },
                Err(e) if e.is_retryable() => {
                    return Err(OffchainStorageError::RetriesExhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                },
                Err(e) => return Err(e),
            }
        }
    }
}
