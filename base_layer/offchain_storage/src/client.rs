// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::FieldElement;
use ledger_core::{types::PublicKey, StorageAttestation, TransitionError};
use log::*;

use crate::{
    rpc::{FetchTreeRequest, StoreRequest},
    LeafMap,
    OffchainStorageError,
    StorageServer,
};

const LOG_TARGET: &str = "ledger::offchain_storage::client";

/// Talks to a [`StorageServer`] and checks everything it returns: fetched maps against the requested root, and
/// attestations against the locally computed root and the server key.
pub struct OffchainStorageClient<S> {
    server: S,
    server_key: PublicKey,
}

impl<S: StorageServer> OffchainStorageClient<S> {
    /// Asks the server for its public key, which is then trusted for the lifetime of this client
    pub async fn connect(server: S) -> Result<Self, OffchainStorageError> {
        let server_key = server.server_public_key().await?;
        Ok(Self { server, server_key })
    }

    /// Uses a server key obtained elsewhere, e.g. the one held by the anchor
    pub fn with_server_key(server: S, server_key: PublicKey) -> Self {
        Self { server, server_key }
    }

    pub fn server_key(&self) -> &PublicKey {
        &self.server_key
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub async fn fetch(&self, root: FieldElement, height: usize) -> Result<LeafMap, OffchainStorageError> {
        let leaves = self.server.fetch(FetchTreeRequest { root, height }).await?;
        let actual = leaves.root(height)?;
        if actual != root {
            warn!(
                target: LOG_TARGET,
                "Storage server returned a map with root {} for root {}", actual, root
            );
            return Err(TransitionError::MapRootMismatch { expected: root, actual }.into());
        }
        trace!(target: LOG_TARGET, "Fetched {} leaves for root {}", leaves.len(), root);
        Ok(leaves)
    }

    pub async fn store(&self, height: usize, leaves: LeafMap) -> Result<StorageAttestation, OffchainStorageError> {
        let expected_root = leaves.root(height)?;
        let attestation = self.server.store(StoreRequest { height, leaves }).await?;
        if attestation.root != expected_root {
            return Err(TransitionError::BadAttestation("the server attested to a different root").into());
        }
        if !attestation.verify(&self.server_key) {
            return Err(TransitionError::BadAttestation("invalid server signature").into());
        }
        Ok(attestation)
    }
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;
    use ledger_core::types::PrivateKey;
    use rand::rngs::OsRng;
    use tari_crypto::keys::PublicKey as _;

    use super::*;
    use crate::MemoryStorageServer;

    /// Serves a fixed map for every root and signs with its own key
    struct LyingServer {
        leaves: LeafMap,
        secret: PrivateKey,
    }

    #[async_trait]
    impl StorageServer for LyingServer {
        async fn server_public_key(&self) -> Result<PublicKey, OffchainStorageError> {
            Ok(PublicKey::from_secret_key(&self.secret))
        }

        async fn fetch(&self, _request: FetchTreeRequest) -> Result<LeafMap, OffchainStorageError> {
            Ok(self.leaves.clone())
        }

        async fn store(&self, request: StoreRequest) -> Result<StorageAttestation, OffchainStorageError> {
            // Attests to the map it serves instead of the one it was given
            let root = self.leaves.root(request.height)?;
            Ok(StorageAttestation::sign(&self.secret, root, 1)?)
        }
    }

    fn lying_server() -> LyingServer {
        let mut leaves = LeafMap::new();
        leaves.insert(0, FieldElement::from(99));
        let (secret, _) = PublicKey::random_keypair(&mut OsRng);
        LyingServer { leaves, secret }
    }

    #[tokio::test]
    async fn fetched_map_must_match_the_root() {
        let client = OffchainStorageClient::connect(lying_server()).await.unwrap();
        let err = client.fetch(FieldElement::from(1), 4).await.unwrap_err();
        assert!(matches!(
            err,
            OffchainStorageError::TransitionError(TransitionError::MapRootMismatch { .. })
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn attestation_must_cover_the_stored_root() {
        let client = OffchainStorageClient::connect(lying_server()).await.unwrap();
        let mut leaves = LeafMap::new();
        leaves.insert(1, FieldElement::ONE);
        let err = client.store(4, leaves).await.unwrap_err();
        assert!(matches!(
            err,
            OffchainStorageError::TransitionError(TransitionError::BadAttestation(_))
        ));
    }

    #[tokio::test]
    async fn attestation_must_be_signed_by_the_trusted_key() {
        let server = MemoryStorageServer::random();
        let (_, other_key) = PublicKey::random_keypair(&mut OsRng);
        let client = OffchainStorageClient::with_server_key(server, other_key);
        let err = client.store(4, LeafMap::new()).await.unwrap_err();
        assert!(matches!(
            err,
            OffchainStorageError::TransitionError(TransitionError::BadAttestation(_))
        ));
    }

    #[tokio::test]
    async fn honest_round_trip() {
        let server = MemoryStorageServer::random();
        let client = OffchainStorageClient::connect(server.clone()).await.unwrap();
        assert_eq!(client.server_key(), server.public_key());
        let mut leaves = LeafMap::new();
        leaves.insert(3, FieldElement::from(4));
        let attestation = client.store(4, leaves.clone()).await.unwrap();
        assert_eq!(client.fetch(attestation.root, 4).await.unwrap(), leaves);
    }
}
