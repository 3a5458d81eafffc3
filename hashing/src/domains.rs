// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use tari_crypto::hash_domain;

// Leaf, node and generic tuple hashing for the ledger tree. The label passed to the hasher separates the three uses.
hash_domain!(MerkleLedgerHashDomain, "com.tari.merkle_ledger.tree", 1);

// Challenge domain for the sender's authorization of a balance transfer
hash_domain!(TransferSignatureDomain, "com.tari.merkle_ledger.transfer_signature", 1);

// Challenge domain for the storage server's attestation over a stored leaf map root
hash_domain!(
    StorageAttestationDomain,
    "com.tari.merkle_ledger.offchain_storage.attestation",
    1
);
