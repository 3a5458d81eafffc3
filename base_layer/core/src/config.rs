// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use ledger_common::{ConfigurationError, SubConfigPath};
use ledger_smt::MAX_TREE_HEIGHT;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Height of the account tree. The ledger has room for 2^tree_height accounts.
    pub tree_height: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { tree_height: 8 }
    }
}

impl SubConfigPath for LedgerConfig {
    fn main_key_prefix() -> &'static str {
        "ledger"
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.tree_height == 0 || self.tree_height > MAX_TREE_HEIGHT {
            return Err(ConfigurationError::new(
                "ledger.tree_height",
                format!("must be between 1 and {}", MAX_TREE_HEIGHT),
            ));
        }
        Ok(())
    }
}
