// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::sync::Arc;

use ledger_core::CounterAnchor;
use ledger_hashing::LedgerHasher;
use ledger_offchain_storage::{
    CounterSyncClient,
    MemoryStorageServer,
    OffchainStorageClient,
    OffchainStorageConfig,
    StorageServer,
};
use ledger_smt::SparseMerkleTree;

pub fn test_config() -> OffchainStorageConfig {
    OffchainStorageConfig {
        tree_height: 8,
        max_retries: 3,
        counter_increment: 3,
        snapshot_file: None,
    }
}

/// An anchor over the empty tree, trusting `server`
pub fn create_anchor(server: &MemoryStorageServer, config: &OffchainStorageConfig) -> Arc<CounterAnchor> {
    let anchor = CounterAnchor::new(server.public_key().clone(), config.tree_height);
    anchor
        .init(SparseMerkleTree::<LedgerHasher>::new(config.tree_height).unwrap().root())
        .unwrap();
    Arc::new(anchor)
}

pub async fn create_client<S: StorageServer>(
    server: S,
    anchor: &Arc<CounterAnchor>,
    config: &OffchainStorageConfig,
) -> CounterSyncClient<S> {
    let storage = OffchainStorageClient::connect(server).await.unwrap();
    CounterSyncClient::new(storage, anchor.clone(), config.clone())
}
