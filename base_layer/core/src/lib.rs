// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! # Merkle ledger core
//!
//! The whole ledger state is represented by a single committed root of a [`SparseMerkleTree`]. The full leaf contents
//! live elsewhere (in a client's local tree or on an off-chain storage server); every mutation presents the claimed
//! prior leaf values together with their inclusion witnesses, and is only accepted if those witnesses authenticate
//! against the committed root.
//!
//! * [`RootCommitmentStore`] holds the committed root and swaps it atomically.
//! * [`CounterUpdate`] and [`BalanceTransfer`] are the two state transitions. Both are pure: they take the current root
//!   and return the new root or a [`TransitionError`].
//! * [`LedgerAnchor`] and [`CounterAnchor`] combine a store with a transition and its authorization checks.
//! * [`AccountLedger`] is the client side of the balance ledger: it holds the full tree and prepares transfers.
//!
//! [`SparseMerkleTree`]: ledger_smt::SparseMerkleTree

mod account;
pub use account::{owner_key_hash, public_key_field, AccountLeaf};

mod anchor;
pub use anchor::{CounterAnchor, LedgerAnchor};

mod attestation;
pub use attestation::{attestation_message, StorageAttestation};

mod config;
pub use config::LedgerConfig;

mod error;
pub use error::TransitionError;

mod ledger;
pub use ledger::{AccountLedger, PreparedTransfer};

mod root_store;
pub use root_store::RootCommitmentStore;

pub mod transitions;
pub use transitions::{counter::CounterUpdate, transfer::BalanceTransfer};

pub mod types;
