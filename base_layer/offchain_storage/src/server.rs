// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use async_trait::async_trait;
use ledger_core::types::PublicKey;

use crate::{
    rpc::{FetchTreeRequest, StorageAttestation, StoreRequest},
    LeafMap,
    OffchainStorageError,
};

/// The storage server interface. Implementations may sit behind any transport; none of the answers are trusted by
/// the client without checking them against a root or the server key.
#[async_trait]
pub trait StorageServer: Send + Sync {
    async fn server_public_key(&self) -> Result<PublicKey, OffchainStorageError>;

    /// Returns the leaf map stored for `root`
    async fn fetch(&self, request: FetchTreeRequest) -> Result<LeafMap, OffchainStorageError>;

    /// Stores a leaf map and attests to its root
    async fn store(&self, request: StoreRequest) -> Result<StorageAttestation, OffchainStorageError>;
}
