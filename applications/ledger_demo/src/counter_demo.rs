// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::sync::Arc;

use anyhow::{anyhow, Context};
use ledger_core::{types::PublicKey, CounterAnchor};
use ledger_hashing::LedgerHasher;
use ledger_offchain_storage::{
    CounterSyncClient,
    CounterSyncOutcome,
    MemoryStorageServer,
    OffchainStorageClient,
    OffchainStorageConfig,
};
use ledger_smt::SparseMerkleTree;
use log::*;
use rand::{rngs::OsRng, Rng};
use tari_crypto::keys::PublicKey as _;

const LOG_TARGET: &str = "ledger::demo::counter";

/// Runs `rounds` counter updates.
///
/// Without a snapshot file the anchor starts at the empty tree. With one, the storage server is restored from the
/// snapshot and the anchor is recreated at the single root it holds; when done, the server keeps only the committed
/// map and writes it back. The restored server signs with a fresh key, which the recreated anchor trusts.
pub async fn run_counter_demo(
    config: &OffchainStorageConfig,
    rounds: usize,
    leaf_range: u64,
) -> Result<Vec<CounterSyncOutcome>, anyhow::Error> {
    config.validate()?;
    let capacity = 1u64 << config.tree_height;
    if leaf_range == 0 || leaf_range > capacity {
        return Err(anyhow!("leaf_range must be between 1 and {}", capacity));
    }
    let empty_root = SparseMerkleTree::<LedgerHasher>::new(config.tree_height)?.root();
    let (server, initial_root) = match &config.snapshot_file {
        Some(path) if path.exists() => {
            let (secret, _) = PublicKey::random_keypair(&mut OsRng);
            let server = MemoryStorageServer::load_snapshot(secret, path)
                .await
                .with_context(|| format!("Could not load the storage snapshot {}", path.display()))?;
            let root = match server.stored_roots(config.tree_height).await.as_slice() {
                [] => empty_root,
                [root] => *root,
                roots => {
                    return Err(anyhow!(
                        "The snapshot {} holds {} trees of height {}, expected at most one",
                        path.display(),
                        roots.len(),
                        config.tree_height
                    ))
                },
            };
            info!(target: LOG_TARGET, "Resuming from {} at root {}", path.display(), root);
            (server, root)
        },
        _ => (MemoryStorageServer::random(), empty_root),
    };

    let anchor = CounterAnchor::new(server.public_key().clone(), config.tree_height);
    anchor.init(initial_root)?;
    let anchor = Arc::new(anchor);

    let storage = OffchainStorageClient::connect(server.clone()).await?;
    let client = CounterSyncClient::new(storage, anchor.clone(), config.clone());

    let mut outcomes = Vec::with_capacity(rounds);
    for round in 1..=rounds {
        let index = rand::thread_rng().gen_range(0..leaf_range);
        let outcome = client.update(index).await?;
        info!(
            target: LOG_TARGET,
            "Round {}: leaf {} {} -> {}, root {}",
            round,
            index,
            outcome
                .prior_value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "empty".to_string()),
            outcome.new_value,
            outcome.new_root
        );
        outcomes.push(outcome);
    }

    if let Some(path) = &config.snapshot_file {
        let committed = anchor.root()?;
        server.retain_roots(config.tree_height, &[committed]).await;
        server.save_snapshot(path).await?;
    }
    Ok(outcomes)
}
