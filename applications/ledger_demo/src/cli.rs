// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// A path to the configuration file, `~/.ledger/config.toml` by default
    #[clap(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// A path to the log4rs configuration file. It is created from the bundled sample if it does not exist.
    #[clap(long, env = "LEDGER_LOG_CONFIGURATION", parse(from_os_str))]
    pub log_config: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Increment randomly chosen counters held by an off-chain storage server
    Counter {
        /// Number of updates to run
        #[clap(long, default_value = "3")]
        rounds: usize,
        /// Counters are picked from the leaves `0..leaf_range`
        #[clap(long, default_value = "4")]
        leaf_range: u64,
    },
    /// Fund an account and transfer part of its balance to a new account
    Transfer {
        #[clap(long, default_value = "100")]
        initial_balance: u64,
        #[clap(long, default_value = "30")]
        amount: u64,
        /// Leaf index of the recipient account
        #[clap(long, default_value = "5")]
        recipient: u64,
    },
}
