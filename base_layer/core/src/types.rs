// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_hashing::{StorageAttestationDomain, TransferSignatureDomain};
use tari_crypto::ristretto::{RistrettoPublicKey, RistrettoSchnorrWithDomain, RistrettoSecretKey};

pub type PublicKey = RistrettoPublicKey;

pub type PrivateKey = RistrettoSecretKey;

/// The sender's authorization of a balance transfer
pub type TransferSignature = RistrettoSchnorrWithDomain<TransferSignatureDomain>;

/// The storage server's signature over a stored root and its sequence number
pub type AttestationSignature = RistrettoSchnorrWithDomain<StorageAttestationDomain>;
