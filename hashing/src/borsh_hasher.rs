// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use core::marker::PhantomData;

use borsh::{io, io::Write, BorshSerialize};
use digest::Digest;
use ledger_common_types::FieldElement;
use tari_crypto::hashing::DomainSeparation;

/// A domain-separated hasher that uses Borsh internally to ensure hashing is canonical.
///
/// This assumes that any input type supports `BorshSerialize` canonically; that is, two different values of the same
/// type must serialize distinctly. Field elements are written as their 32 byte little-endian form, and tuples of
/// field elements carry a length prefix so `[a, b]` and `[a]` never collide.
pub struct DomainSeparatedBorshHasher<M, D> {
    writer: WriteHashWrapper<D>,
    _m: PhantomData<M>,
}

impl<D: Digest + Default, M: DomainSeparation> DomainSeparatedBorshHasher<M, D> {
    #[allow(clippy::new_ret_no_self)]
    pub fn new_with_label(label: &str) -> Self {
        let mut digest = D::default();
        M::add_domain_separation_tag(&mut digest, label);
        Self {
            writer: WriteHashWrapper(digest),
            _m: PhantomData,
        }
    }

    pub fn finalize(self) -> digest::Output<D> {
        self.writer.0.finalize()
    }

    /// Update the hasher using the Borsh encoding of the input, which is assumed to be canonical.
    pub fn update_consensus_encode<T: BorshSerialize>(&mut self, data: &T) {
        BorshSerialize::serialize(data, &mut self.writer)
            .expect("Incorrect implementation of BorshSerialize encountered. Implementations MUST be infallible.");
    }

    pub fn chain<T: BorshSerialize>(mut self, data: &T) -> Self {
        self.update_consensus_encode(data);
        self
    }

    /// Hashes an ordered tuple of field elements, including its length
    pub fn chain_fields(self, fields: &[FieldElement]) -> Self {
        self.chain(&fields)
    }
}

/// This private struct wraps a Digest and implements the Write trait to satisfy the consensus encoding trait.
#[derive(Clone)]
struct WriteHashWrapper<D>(D);

impl<D: Digest> Write for WriteHashWrapper<D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
