// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common_types::{FieldElement, LeafIndex, LeafValue, FIELD_ELEMENT_BYTES};
use ledger_hashing::{FieldHasher, LedgerHasher};
use serde::{Deserialize, Serialize};
use tari_utilities::ByteArray;

use crate::{types::PublicKey, TransitionError};

/// Interprets the compressed public key bytes as a field element
pub fn public_key_field(public_key: &PublicKey) -> FieldElement {
    let mut bytes = [0u8; FIELD_ELEMENT_BYTES];
    bytes.copy_from_slice(public_key.as_bytes());
    FieldElement::from_le_bytes(bytes)
}

/// The commitment to an account owner that is stored in the account leaf
pub fn owner_key_hash(public_key: &PublicKey) -> FieldElement {
    LedgerHasher::hash_fields(&[public_key_field(public_key)])
}

/// The value of a balance ledger leaf: `(balance, owner_key_hash)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLeaf {
    pub balance: FieldElement,
    pub owner_key_hash: FieldElement,
}

impl AccountLeaf {
    pub fn new(balance: FieldElement, owner: &PublicKey) -> Self {
        Self {
            balance,
            owner_key_hash: owner_key_hash(owner),
        }
    }

    pub fn is_owned_by(&self, public_key: &PublicKey) -> bool {
        self.owner_key_hash == owner_key_hash(public_key)
    }

    /// The same owner with a different balance
    pub fn with_balance(&self, balance: FieldElement) -> Self {
        Self {
            balance,
            owner_key_hash: self.owner_key_hash,
        }
    }

    pub fn to_leaf_value(&self) -> LeafValue {
        LeafValue::from([self.balance, self.owner_key_hash])
    }

    pub fn leaf_hash(&self) -> FieldElement {
        LedgerHasher::hash_leaf(&[self.balance, self.owner_key_hash])
    }

    /// Reads an account back out of the leaf stored at `index`
    pub fn from_leaf_value(index: LeafIndex, value: &LeafValue) -> Result<Self, TransitionError> {
        match value.fields() {
            [balance, owner_key_hash] => Ok(Self {
                balance: *balance,
                owner_key_hash: *owner_key_hash,
            }),
            fields => Err(TransitionError::MalformedLeaf {
                index,
                fields: fields.len(),
            }),
        }
    }
}

impl From<AccountLeaf> for LeafValue {
    fn from(account: AccountLeaf) -> Self {
        account.to_leaf_value()
    }
}
