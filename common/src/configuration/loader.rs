// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use config::{Config, Value};

use super::error::ConfigurationError;

pub trait ConfigPath {
    /// Main configuration section
    fn main_key_prefix() -> &'static str;

    /// Produces the config from which `Self` is deserialized, with `defaults` placed underneath the values found at
    /// `main_key_prefix()`.
    fn merge_subconfig(config: &Config, defaults: Value) -> Result<Config, ConfigurationError> {
        let merged = Config::builder()
            .set_default(Self::main_key_prefix(), defaults)?
            .add_source(config.clone())
            .build()?;
        Ok(merged)
    }
}

/// Implemented by config structs that live in a single top level section, e.g. `[ledger]`.
pub trait SubConfigPath {
    /// Returns the string representing the top level configuration category.
    /// For example, in the following TOML file, options for `main_key_prefix` would be `MainKeyOne` or `MainKeyTwo`:
    /// ```toml
    /// [MainKeyOne]
    ///   subkey1=1
    /// [MainKeyTwo]
    ///   subkey2=1
    /// ```
    fn main_key_prefix() -> &'static str;
}

impl<C: SubConfigPath> ConfigPath for C {
    fn main_key_prefix() -> &'static str {
        <Self as SubConfigPath>::main_key_prefix()
    }
}

pub trait ConfigLoader: ConfigPath + for<'de> serde::de::Deserialize<'de> {
    /// Try to load configuration from supplied Config by `main_key_prefix()`.
    ///
    /// Missing fields must be covered by `#[serde(default)]`. For automated inheritance of Default values use
    /// DefaultConfigLoader.
    fn load_from(config: &Config) -> Result<Self, ConfigurationError> {
        Ok(config.get(Self::main_key_prefix())?)
    }
}

impl<C> ConfigLoader for C where C: ConfigPath + for<'de> serde::de::Deserialize<'de> {}

pub trait DefaultConfigLoader:
    ConfigPath + Default + serde::ser::Serialize + for<'de> serde::de::Deserialize<'de>
{
    /// Try to load configuration from supplied Config by `main_key_prefix()`.
    ///
    /// Default values will be taken from the Default impl for the struct.
    fn load_from(config: &Config) -> Result<Self, ConfigurationError> {
        let default = <Self as Default>::default();
        let buf = serde_json::to_string(&default)?;
        let value: Value = serde_json::from_str(buf.as_str())?;
        let merger = Self::merge_subconfig(config, value)?;
        Ok(merger.get(Self::main_key_prefix())?)
    }
}

impl<C> DefaultConfigLoader for C where C: ConfigPath + Default + serde::ser::Serialize + for<'de> serde::de::Deserialize<'de>
{}
