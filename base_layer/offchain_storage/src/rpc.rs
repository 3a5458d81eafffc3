// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Request and response types of the storage server interface:
//!
//! * `GET serverPublicKey -> ServerPublicKeyResponse`
//! * `GET tree(root, height) -> LeafMap`
//! * `POST store(height, leaves) -> StorageAttestation`

use ledger_common_types::FieldElement;
use ledger_core::types::PublicKey;
pub use ledger_core::StorageAttestation;
use serde::{Deserialize, Serialize};

use crate::LeafMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPublicKeyResponse {
    pub server_public_key: PublicKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTreeRequest {
    pub root: FieldElement,
    pub height: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequest {
    pub height: usize,
    pub leaves: LeafMap,
}
