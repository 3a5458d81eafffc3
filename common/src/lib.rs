// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! # Common logging and configuration utilities
//!
//! Every ledger application reads a single TOML configuration file. Each component owns one section of that file and
//! deserializes it into its own config struct via [`DefaultConfigLoader`], which layers the struct's `Default` values
//! underneath whatever the file provides:
//!
//! ```
//! # use ledger_common::{DefaultConfigLoader, SubConfigPath};
//! # use serde::{Deserialize, Serialize};
//! #[derive(Serialize, Deserialize, Debug)]
//! struct ServerConfig {
//!     port: u16,
//!     name: String,
//! }
//!
//! impl Default for ServerConfig {
//!     fn default() -> Self {
//!         Self { port: 8000, name: "default".to_string() }
//!     }
//! }
//!
//! impl SubConfigPath for ServerConfig {
//!     fn main_key_prefix() -> &'static str {
//!         "server"
//!     }
//! }
//!
//! let cfg = ledger_common::load_configuration_from_str("[server]\nport = 9000").unwrap();
//! let server = ServerConfig::load_from(&cfg).unwrap();
//! assert_eq!(server.port, 9000);
//! assert_eq!(server.name, "default");
//! ```
//!
//! Data files live in a `.ledger` folder under the user's home folder (see [`dir_utils`]).

pub mod configuration;
pub mod dir_utils;
mod logging;

pub use configuration::{
    error::ConfigurationError,
    load_configuration,
    load_configuration_from_str,
    loader::{ConfigLoader, ConfigPath, DefaultConfigLoader, SubConfigPath},
};
pub use logging::{get_log_configuration_path, initialize_logging, install_default_logfile_config, LOG_CONFIG_ENV_VAR};

pub const DEFAULT_CONFIG: &str = "config.toml";
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";
