// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::path::Path;

use config::{Config, File, FileFormat};

pub mod error;
pub mod loader;

use error::ConfigurationError;

/// Loads the TOML configuration file at `path`. A missing file yields an empty configuration, so every component
/// falls back to its defaults.
pub fn load_configuration(path: &Path) -> Result<Config, ConfigurationError> {
    let source = File::from(path).format(FileFormat::Toml).required(false);
    Ok(Config::builder().add_source(source).build()?)
}

/// Parses configuration from an in-memory TOML document
pub fn load_configuration_from_str(toml: &str) -> Result<Config, ConfigurationError> {
    Ok(Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?)
}
