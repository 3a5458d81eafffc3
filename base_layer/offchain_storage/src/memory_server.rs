// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{collections::HashMap, path::Path, sync::Arc};

use async_trait::async_trait;
use ledger_common_types::FieldElement;
use ledger_core::{
    types::{PrivateKey, PublicKey},
    StorageAttestation,
};
use ledger_hashing::LedgerHasher;
use ledger_smt::SparseMerkleTree;
use log::*;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tari_crypto::keys::PublicKey as _;
use tokio::{fs, sync::RwLock};

use crate::{
    rpc::{FetchTreeRequest, StoreRequest},
    LeafMap,
    OffchainStorageError,
    StorageServer,
};

const LOG_TARGET: &str = "ledger::offchain_storage::memory_server";

#[derive(Debug, Default)]
struct ServerState {
    sequence: u64,
    trees: HashMap<(usize, FieldElement), LeafMap>,
}

#[derive(Serialize, Deserialize)]
struct StoredTree {
    height: usize,
    root: FieldElement,
    leaves: LeafMap,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    sequence: u64,
    trees: Vec<StoredTree>,
}

/// A storage server that keeps every stored leaf map in memory, keyed by height and root. The state can be written
/// to and restored from a JSON snapshot.
///
/// Every `store` adds a map, including the maps of updates that later lose a race at the anchor, so the server grows
/// without bound until [`MemoryStorageServer::retain_roots`] drops the maps that were never committed.
#[derive(Clone)]
pub struct MemoryStorageServer {
    secret_key: Arc<PrivateKey>,
    public_key: PublicKey,
    state: Arc<RwLock<ServerState>>,
}

impl MemoryStorageServer {
    pub fn new(secret_key: PrivateKey) -> Self {
        let public_key = PublicKey::from_secret_key(&secret_key);
        Self {
            secret_key: Arc::new(secret_key),
            public_key,
            state: Arc::new(RwLock::new(ServerState::default())),
        }
    }

    pub fn random() -> Self {
        let (secret_key, _) = PublicKey::random_keypair(&mut OsRng);
        Self::new(secret_key)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The sequence number of the last attestation issued
    pub async fn sequence(&self) -> u64 {
        self.state.read().await.sequence
    }

    pub async fn num_stored_trees(&self) -> usize {
        self.state.read().await.trees.len()
    }

    /// The roots of all maps stored for trees of `height`, in ascending order
    pub async fn stored_roots(&self, height: usize) -> Vec<FieldElement> {
        let mut roots = self
            .state
            .read()
            .await
            .trees
            .keys()
            .filter(|(h, _)| *h == height)
            .map(|(_, root)| *root)
            .collect::<Vec<_>>();
        roots.sort();
        roots
    }

    /// Drops every map of a tree of `height` whose root is not in `keep`. Maps of other heights are untouched.
    /// Returns the number of maps removed.
    pub async fn retain_roots(&self, height: usize, keep: &[FieldElement]) -> usize {
        let mut state = self.state.write().await;
        let before = state.trees.len();
        state
            .trees
            .retain(|(h, root), _| *h != height || keep.contains(root));
        let removed = before - state.trees.len();
        debug!(
            target: LOG_TARGET,
            "Pruned {} maps of height {}, {} maps remain",
            removed,
            height,
            state.trees.len()
        );
        removed
    }

    pub async fn save_snapshot(&self, path: &Path) -> Result<(), OffchainStorageError> {
        let snapshot = {
            let state = self.state.read().await;
            let mut trees = state
                .trees
                .iter()
                .map(|((height, root), leaves)| StoredTree {
                    height: *height,
                    root: *root,
                    leaves: leaves.clone(),
                })
                .collect::<Vec<_>>();
            trees.sort_by_key(|t| (t.height, t.root));
            Snapshot {
                sequence: state.sequence,
                trees,
            }
        };
        let json = serde_json::to_vec_pretty(&snapshot)?;
        fs::write(path, json).await?;
        debug!(
            target: LOG_TARGET,
            "Saved {} trees to {}",
            snapshot.trees.len(),
            path.display()
        );
        Ok(())
    }

    /// Restores a server from a snapshot. Every stored map is checked against the root it is stored under.
    pub async fn load_snapshot(secret_key: PrivateKey, path: &Path) -> Result<Self, OffchainStorageError> {
        let json = fs::read(path).await?;
        let snapshot: Snapshot = serde_json::from_slice(&json)?;
        let mut trees = HashMap::with_capacity(snapshot.trees.len());
        for tree in snapshot.trees {
            let actual = tree.leaves.root(tree.height)?;
            if actual != tree.root {
                return Err(OffchainStorageError::SnapshotError(format!(
                    "the leaves stored under root {} hash to {}",
                    tree.root, actual
                )));
            }
            trees.insert((tree.height, tree.root), tree.leaves);
        }
        info!(
            target: LOG_TARGET,
            "Loaded {} trees from {}, sequence {}",
            trees.len(),
            path.display(),
            snapshot.sequence
        );
        let server = Self::new(secret_key);
        *server.state.write().await = ServerState {
            sequence: snapshot.sequence,
            trees,
        };
        Ok(server)
    }
}

#[async_trait]
impl StorageServer for MemoryStorageServer {
    async fn server_public_key(&self) -> Result<PublicKey, OffchainStorageError> {
        Ok(self.public_key.clone())
    }

    async fn fetch(&self, request: FetchTreeRequest) -> Result<LeafMap, OffchainStorageError> {
        let FetchTreeRequest { root, height } = request;
        if let Some(leaves) = self.state.read().await.trees.get(&(height, root)) {
            return Ok(leaves.clone());
        }
        // Nothing needs to be stored for a tree without leaves
        if SparseMerkleTree::<LedgerHasher>::new(height)?.root() == root {
            return Ok(LeafMap::new());
        }
        Err(OffchainStorageError::UnknownRoot { root, height })
    }

    async fn store(&self, request: StoreRequest) -> Result<StorageAttestation, OffchainStorageError> {
        let StoreRequest { height, leaves } = request;
        let root = leaves.root(height)?;
        let mut state = self.state.write().await;
        let sequence = state.sequence + 1;
        let attestation = StorageAttestation::sign(&self.secret_key, root, sequence)?;
        state.sequence = sequence;
        state.trees.insert((height, root), leaves);
        debug!(
            target: LOG_TARGET,
            "Stored tree of height {} with root {}, attestation #{}", height, root, sequence
        );
        Ok(attestation)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn store_then_fetch() {
        let server = MemoryStorageServer::random();
        let mut leaves = LeafMap::new();
        leaves.insert(1, FieldElement::from(3));
        let attestation = server
            .store(StoreRequest {
                height: 4,
                leaves: leaves.clone(),
            })
            .await
            .unwrap();
        assert_eq!(attestation.sequence, 1);
        assert!(attestation.verify(server.public_key()));
        assert_eq!(attestation.root, leaves.root(4).unwrap());

        let fetched = server
            .fetch(FetchTreeRequest {
                root: attestation.root,
                height: 4,
            })
            .await
            .unwrap();
        assert_eq!(fetched, leaves);
        // Same root under a different height is a different tree
        assert!(matches!(
            server
                .fetch(FetchTreeRequest {
                    root: attestation.root,
                    height: 5
                })
                .await,
            Err(OffchainStorageError::UnknownRoot { height: 5, .. })
        ));
    }

    #[tokio::test]
    async fn empty_tree_is_always_available() {
        let server = MemoryStorageServer::random();
        let root = SparseMerkleTree::<LedgerHasher>::new(8).unwrap().root();
        let leaves = server.fetch(FetchTreeRequest { root, height: 8 }).await.unwrap();
        assert!(leaves.is_empty());
    }

    #[tokio::test]
    async fn rejects_indices_outside_the_tree() {
        let server = MemoryStorageServer::random();
        let mut leaves = LeafMap::new();
        leaves.insert(300, FieldElement::ONE);
        let err = server.store(StoreRequest { height: 8, leaves }).await.unwrap_err();
        assert!(matches!(err, OffchainStorageError::InvalidLeafMap(_)));
        assert_eq!(server.sequence().await, 0);
    }

    #[tokio::test]
    async fn sequence_increases_with_every_store() {
        let server = MemoryStorageServer::random();
        for expected in 1..=3 {
            let mut leaves = LeafMap::new();
            leaves.insert(0, FieldElement::from(expected));
            let attestation = server.store(StoreRequest { height: 2, leaves }).await.unwrap();
            assert_eq!(attestation.sequence, expected);
        }
        assert_eq!(server.num_stored_trees().await, 3);
    }

    #[tokio::test]
    async fn retain_roots_drops_uncommitted_maps() {
        let server = MemoryStorageServer::random();
        let mut roots = Vec::new();
        for value in 1..=3 {
            let mut leaves = LeafMap::new();
            leaves.insert(0, FieldElement::from(value));
            roots.push(server.store(StoreRequest { height: 2, leaves }).await.unwrap().root);
        }
        let mut other = LeafMap::new();
        other.insert(0, FieldElement::ONE);
        server.store(StoreRequest { height: 3, leaves: other }).await.unwrap();

        assert_eq!(server.retain_roots(2, &[roots[1]]).await, 2);
        assert_eq!(server.stored_roots(2).await, vec![roots[1]]);
        assert_eq!(server.num_stored_trees().await, 2);
        assert!(matches!(
            server.fetch(FetchTreeRequest { root: roots[0], height: 2 }).await,
            Err(OffchainStorageError::UnknownRoot { .. })
        ));
        // The sequence is not rewound
        assert_eq!(server.sequence().await, 4);
    }
}
