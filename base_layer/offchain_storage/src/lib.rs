// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! # Off-chain storage
//!
//! The counter anchor only commits to a root. The leaf map behind that root is kept by a storage server, which
//! returns it to any client that asks for a root, and attests (with a signature over the root and an increasing
//! sequence number) to every map it stores. An update round trip looks like this:
//!
//! 1. read the committed root from the anchor and [fetch](OffchainStorageClient::fetch) the map for it. The client
//!    recomputes the root of the returned map and rejects a mismatch.
//! 2. change one leaf locally and [store](OffchainStorageClient::store) the new map, receiving an attestation.
//! 3. submit the counter update and the attestation to the anchor.
//!
//! If another client commits in between, step 3 fails with a stale witness and [`CounterSyncClient`] starts over.

mod client;
pub use client::OffchainStorageClient;

mod config;
pub use config::OffchainStorageConfig;

mod counter_sync;
pub use counter_sync::{CounterSyncClient, CounterSyncOutcome, PendingCounterUpdate};

mod error;
pub use error::OffchainStorageError;

mod leaf_map;
pub use leaf_map::LeafMap;

mod memory_server;
pub use memory_server::MemoryStorageServer;

pub mod rpc;

mod server;
pub use server::StorageServer;
