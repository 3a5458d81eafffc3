// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
mod counter_demo;
mod transfer_demo;

use std::process;

use clap::Parser;
use cli::{Cli, Command};
use ledger_common::{
    dir_utils,
    get_log_configuration_path,
    initialize_logging,
    load_configuration,
    DefaultConfigLoader,
    DEFAULT_CONFIG,
};
use ledger_core::LedgerConfig;
use ledger_offchain_storage::OffchainStorageConfig;
use log::*;

const LOG_TARGET: &str = "ledger::demo";

fn main() {
    if let Err(err) = main_inner() {
        eprintln!("{:?}", err);
        error!(target: LOG_TARGET, "Exiting with error: {:?}", err);
        process::exit(1);
    }
}

fn main_inner() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let log_config = get_log_configuration_path(cli.log_config.clone());
    initialize_logging(&log_config);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| dir_utils::default_path(DEFAULT_CONFIG));
    let cfg = load_configuration(&config_path)?;
    debug!(target: LOG_TARGET, "Using configuration file {}", config_path.display());

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    match cli.command {
        Command::Counter { rounds, leaf_range } => {
            let config = <OffchainStorageConfig as DefaultConfigLoader>::load_from(&cfg)?;
            let outcomes = runtime.block_on(counter_demo::run_counter_demo(&config, rounds, leaf_range))?;
            for outcome in outcomes {
                println!(
                    "leaf {:>3}: {} -> {} ({} attempt(s))",
                    outcome.index,
                    outcome
                        .prior_value
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "empty".to_string()),
                    outcome.new_value,
                    outcome.attempts
                );
            }
        },
        Command::Transfer {
            initial_balance,
            amount,
            recipient,
        } => {
            let config = <LedgerConfig as DefaultConfigLoader>::load_from(&cfg)?;
            let summary = transfer_demo::run_transfer_demo(&config, initial_balance, amount, recipient)?;
            println!("root {} -> {}", summary.initial_root, summary.final_root);
            println!(
                "sender balance {}, recipient balance {}",
                summary.sender_balance, summary.recipient_balance
            );
        },
    }
    Ok(())
}
