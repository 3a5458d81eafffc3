// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    env,
    fs,
    io,
    path::{Path, PathBuf},
};

use crate::{dir_utils, DEFAULT_LOG_CONFIG};

pub const LOG_CONFIG_ENV_VAR: &str = "LEDGER_LOG_CONFIGURATION";

const SAMPLE_LOG_CONFIG: &str = include_str!("../logging/log4rs_sample.yml");

/// Determines the path of the log configuration file, using the following precedence:
///   1. the command-line parameter,
///   2. the `LEDGER_LOG_CONFIGURATION` environment variable,
///   3. `~/.ledger/log4rs.yml` (or OS equivalent).
pub fn get_log_configuration_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path
        .or_else(|| {
            env::var_os(LOG_CONFIG_ENV_VAR)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| dir_utils::default_path(DEFAULT_LOG_CONFIG))
}

/// Installs the sample log configuration at `config_file` if nothing is there yet and initializes log4rs from it.
/// Returns false if logging could not be set up, in which case the application runs without logs.
pub fn initialize_logging(config_file: &Path) -> bool {
    println!(
        "Initializing logging according to {:?}",
        config_file.to_str().unwrap_or("[??]")
    );
    if !config_file.exists() {
        if let Err(e) = install_default_logfile_config(config_file) {
            println!(
                "We could not install a new log configuration file in {}: {}",
                config_file.to_str().unwrap_or("?"),
                e
            );
            return false;
        }
    }
    if let Err(e) = log4rs::init_file(config_file, Default::default()) {
        println!("We couldn't load a logging configuration file. {}", e);
        return false;
    }
    true
}

/// Writes the bundled sample log configuration to `path`, creating parent folders as needed.
pub fn install_default_logfile_config(path: &Path) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, SAMPLE_LOG_CONFIG)
}
