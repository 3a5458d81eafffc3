// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

mod borsh_hasher;
pub use borsh_hasher::DomainSeparatedBorshHasher;

mod domains;
pub use domains::*;

mod field_hasher;
pub use field_hasher::{DomainFieldHasher, FieldHasher, LedgerHasher, FIELDS_LABEL, LEAF_LABEL, NODE_LABEL};
