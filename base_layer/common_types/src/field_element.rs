// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{convert::TryFrom, fmt, str::FromStr};

use borsh::{io, BorshDeserialize, BorshSerialize};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The number of bytes in the canonical encoding of a field element
pub const FIELD_ELEMENT_BYTES: usize = 32;

/// A 256-bit word. Every leaf value, node hash and root in the ledger is expressed as one of these.
///
/// The canonical byte form is 32 bytes little-endian. Arithmetic is only exposed in checked form so callers must
/// decide what an underflow or overflow means for them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldElement(U256);

impl FieldElement {
    pub const ZERO: Self = Self(U256([0, 0, 0, 0]));
    pub const ONE: Self = Self(U256([1, 0, 0, 0]));

    pub fn from_le_bytes(bytes: [u8; FIELD_ELEMENT_BYTES]) -> Self {
        Self(U256::from_little_endian(&bytes))
    }

    pub fn to_le_bytes(&self) -> [u8; FIELD_ELEMENT_BYTES] {
        let mut buf = [0u8; FIELD_ELEMENT_BYTES];
        self.0.to_little_endian(&mut buf);
        buf
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Returns the value as a u64 if it fits
    pub fn as_u64(&self) -> Option<u64> {
        if self.0.bits() <= 64 {
            Some(self.0.low_u64())
        } else {
            None
        }
    }
}

impl From<u64> for FieldElement {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl From<U256> for FieldElement {
    fn from(v: U256) -> Self {
        Self(v)
    }
}

impl From<FieldElement> for U256 {
    fn from(v: FieldElement) -> Self {
        v.0
    }
}

impl TryFrom<&[u8]> for FieldElement {
    type Error = FieldElementError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != FIELD_ELEMENT_BYTES {
            return Err(FieldElementError::InvalidLength {
                expected: FIELD_ELEMENT_BYTES,
                actual: bytes.len(),
            });
        }
        Ok(Self(U256::from_little_endian(bytes)))
    }
}

impl FromStr for FieldElement {
    type Err = FieldElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| FieldElementError::InvalidDecimal(s.to_string()))
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BorshSerialize for FieldElement {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_le_bytes())
    }
}

impl BorshDeserialize for FieldElement {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; FIELD_ELEMENT_BYTES];
        reader.read_exact(&mut buf)?;
        Ok(Self::from_le_bytes(buf))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldElementError {
    #[error("Expected {expected} bytes for a field element, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("'{0}' is not a valid decimal field element")]
    InvalidDecimal(String),
}
