// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::ops::Deref;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::FieldElement;

/// Position of a leaf in a fixed-height tree. Valid indices are `0..2^height`.
pub type LeafIndex = u64;

/// The value stored at a leaf: an ordered tuple of field elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(transparent)]
pub struct LeafValue(Vec<FieldElement>);

impl LeafValue {
    pub fn new(fields: Vec<FieldElement>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[FieldElement] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<FieldElement> {
        self.0
    }
}

impl Deref for LeafValue {
    type Target = [FieldElement];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<FieldElement>> for LeafValue {
    fn from(fields: Vec<FieldElement>) -> Self {
        Self(fields)
    }
}

impl From<FieldElement> for LeafValue {
    fn from(field: FieldElement) -> Self {
        Self(vec![field])
    }
}

impl<const N: usize> From<[FieldElement; N]> for LeafValue {
    fn from(fields: [FieldElement; N]) -> Self {
        Self(fields.to_vec())
    }
}
