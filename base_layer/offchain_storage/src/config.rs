// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;

use ledger_common::{ConfigurationError, SubConfigPath};
use ledger_smt::MAX_TREE_HEIGHT;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OffchainStorageConfig {
    /// Height of the counter tree
    pub tree_height: usize,
    /// How many times an update is retried after losing a race to another client
    pub max_retries: usize,
    /// The amount added to an existing counter on every update
    pub counter_increment: u64,
    /// If set, the storage server state is restored from and saved to this JSON file
    pub snapshot_file: Option<PathBuf>,
}

impl Default for OffchainStorageConfig {
    fn default() -> Self {
        Self {
            tree_height: 8,
            max_retries: 5,
            counter_increment: 3,
            snapshot_file: None,
        }
    }
}

impl SubConfigPath for OffchainStorageConfig {
    fn main_key_prefix() -> &'static str {
        "offchain_storage"
    }
}

impl OffchainStorageConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.tree_height == 0 || self.tree_height > MAX_TREE_HEIGHT {
            return Err(ConfigurationError::new(
                "offchain_storage.tree_height",
                format!("must be between 1 and {}", MAX_TREE_HEIGHT),
            ));
        }
        if self.counter_increment == 0 {
            return Err(ConfigurationError::new(
                "offchain_storage.counter_increment",
                "counters must grow on every update",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use ledger_common::DefaultConfigLoader;

    use super::*;

    #[test]
    fn offchain_storage_configuration() {
        const CONFIG: &str = r#"
[offchain_storage]
max_retries = 2
snapshot_file = "storage.json"
"#;
        let mut cfg: config::Config = config::Config::default();
        #[allow(deprecated)]
        cfg.merge(config::File::from_str(CONFIG, config::FileFormat::Toml))
            .unwrap();
        let config = OffchainStorageConfig::load_from(&cfg).expect("Failed to load config");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.snapshot_file, Some(PathBuf::from("storage.json")));
        assert_eq!(config.tree_height, 8);
        assert_eq!(config.counter_increment, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_increment_is_rejected() {
        let config = OffchainStorageConfig {
            counter_increment: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
