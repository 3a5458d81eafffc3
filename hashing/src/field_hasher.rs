// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{fmt, marker::PhantomData};

use blake2::Blake2b;
use digest::{consts::U32, Digest};
use ledger_common_types::FieldElement;
use tari_crypto::hashing::DomainSeparation;

use crate::{DomainSeparatedBorshHasher, MerkleLedgerHashDomain};

pub const LEAF_LABEL: &str = "leaf";
pub const NODE_LABEL: &str = "node";
pub const FIELDS_LABEL: &str = "fields";

/// A collision-resistant hash over ordered tuples of field elements.
///
/// The tree, the witness verifier and the transition functions all go through this trait, so the ordering and
/// combination rules are identical wherever a root is recomputed.
pub trait FieldHasher {
    fn hash_with_label(label: &str, fields: &[FieldElement]) -> FieldElement;

    /// General purpose tuple hash, e.g. the owner key hash stored in an account leaf
    fn hash_fields(fields: &[FieldElement]) -> FieldElement {
        Self::hash_with_label(FIELDS_LABEL, fields)
    }

    /// The node hash of a populated leaf
    fn hash_leaf(value: &[FieldElement]) -> FieldElement {
        Self::hash_with_label(LEAF_LABEL, value)
    }

    /// Combines two children into their parent. Order matters.
    fn hash_node(left: &FieldElement, right: &FieldElement) -> FieldElement {
        Self::hash_with_label(NODE_LABEL, &[*left, *right])
    }
}

/// A [`FieldHasher`] built from a 32 byte digest and a hash domain.
pub struct DomainFieldHasher<M, D> {
    _phantom: PhantomData<(M, D)>,
}

impl<M, D> FieldHasher for DomainFieldHasher<M, D>
where
    M: DomainSeparation,
    D: Digest<OutputSize = U32> + Default,
{
    fn hash_with_label(label: &str, fields: &[FieldElement]) -> FieldElement {
        let hash = DomainSeparatedBorshHasher::<M, D>::new_with_label(label)
            .chain_fields(fields)
            .finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(hash.as_slice());
        FieldElement::from_le_bytes(bytes)
    }
}

// The hasher is a marker type, so these impls must not place bounds on M and D.
impl<M, D> Clone for DomainFieldHasher<M, D> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<M, D> Default for DomainFieldHasher<M, D> {
    fn default() -> Self {
        Self { _phantom: PhantomData }
    }
}

impl<M, D> PartialEq for DomainFieldHasher<M, D> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<M, D> Eq for DomainFieldHasher<M, D> {}

impl<M, D> fmt::Debug for DomainFieldHasher<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainFieldHasher")
    }
}

/// The hasher used by every ledger tree
pub type LedgerHasher = DomainFieldHasher<MerkleLedgerHashDomain, Blake2b<U32>>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        let a = LedgerHasher::hash_fields(&[FieldElement::from(1), FieldElement::from(2)]);
        let b = LedgerHasher::hash_fields(&[FieldElement::from(1), FieldElement::from(2)]);
        assert_eq!(a, b);
        assert!(!a.is_zero());
    }

    #[test]
    fn leaf_node_and_tuple_hashes_are_separated() {
        let x = FieldElement::from(3);
        let y = FieldElement::from(4);
        let node = LedgerHasher::hash_node(&x, &y);
        assert_ne!(node, LedgerHasher::hash_leaf(&[x, y]));
        assert_ne!(node, LedgerHasher::hash_fields(&[x, y]));
        assert_ne!(LedgerHasher::hash_leaf(&[x, y]), LedgerHasher::hash_fields(&[x, y]));
    }

    #[test]
    fn node_hash_is_ordered() {
        let x = FieldElement::from(3);
        let y = FieldElement::from(4);
        assert_ne!(LedgerHasher::hash_node(&x, &y), LedgerHasher::hash_node(&y, &x));
    }
}
