// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;

pub const DATA_DIR_NAME: &str = ".ledger";

/// The data folder, `~/.ledger`, or `./.ledger` if no home folder can be determined.
pub fn default_data_dir() -> PathBuf {
    let mut home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.push(DATA_DIR_NAME);
    home
}

pub fn default_path(filename: &str) -> PathBuf {
    let mut path = default_data_dir();
    path.push(filename);
    path
}
