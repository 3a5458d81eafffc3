// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

mod field_element;
pub use field_element::{FieldElement, FieldElementError, FIELD_ELEMENT_BYTES};

mod leaf;
pub use leaf::{LeafIndex, LeafValue};
