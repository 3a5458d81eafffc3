// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use blake2::Blake2b;
use digest::consts::U32;
use ledger_common_types::FieldElement;
use ledger_hashing::{DomainSeparatedBorshHasher, StorageAttestationDomain};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::{
    types::{AttestationSignature, PrivateKey, PublicKey},
    TransitionError,
};

/// The message signed by the storage server: the stored root together with its sequence number.
pub fn attestation_message(root: &FieldElement, sequence: u64) -> [u8; 32] {
    let hash = DomainSeparatedBorshHasher::<StorageAttestationDomain, Blake2b<U32>>::new_with_label("attestation")
        .chain(root)
        .chain(&sequence)
        .finalize();
    let mut message = [0u8; 32];
    message.copy_from_slice(hash.as_slice());
    message
}

/// Binds a stored leaf map, identified by its root, to the server's monotonically increasing sequence number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageAttestation {
    pub root: FieldElement,
    pub sequence: u64,
    pub signature: AttestationSignature,
}

impl StorageAttestation {
    pub fn sign(secret: &PrivateKey, root: FieldElement, sequence: u64) -> Result<Self, TransitionError> {
        let signature = AttestationSignature::sign(secret, attestation_message(&root, sequence), &mut OsRng)
            .map_err(|e| TransitionError::SigningFailed(e.to_string()))?;
        Ok(Self {
            root,
            sequence,
            signature,
        })
    }

    #[must_use = "Must use the result of the attestation verification"]
    pub fn verify(&self, server_key: &PublicKey) -> bool {
        self.signature
            .verify(server_key, attestation_message(&self.root, self.sequence))
    }
}

#[cfg(test)]
mod test {
    use tari_crypto::keys::PublicKey as _;

    use super::*;

    #[test]
    fn attestation_verifies_only_for_signed_content() {
        let (secret, public) = PublicKey::random_keypair(&mut OsRng);
        let (_, other) = PublicKey::random_keypair(&mut OsRng);
        let attestation = StorageAttestation::sign(&secret, FieldElement::from(42), 7).unwrap();
        assert!(attestation.verify(&public));
        assert!(!attestation.verify(&other));

        let mut tampered = attestation.clone();
        tampered.sequence = 8;
        assert!(!tampered.verify(&public));
        let mut tampered = attestation;
        tampered.root = FieldElement::from(43);
        assert!(!tampered.verify(&public));
    }

    #[test]
    fn message_depends_on_root_and_sequence() {
        let root = FieldElement::from(1);
        assert_ne!(attestation_message(&root, 1), attestation_message(&root, 2));
        assert_ne!(attestation_message(&root, 1), attestation_message(&FieldElement::from(2), 1));
    }
}
