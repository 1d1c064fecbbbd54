// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Command line interface. Every flag can also be set from the environment.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{
    BATCH_SIZE_ENV, DEFAULT_NETWORK_ENV, EXCLUDED_NETWORKS_ENV, LOG_FORMAT_ENV, MAX_IN_FLIGHT_ENV,
    RESULTS_DIR_ENV, RETRY_ATTEMPTS_ENV, RETRY_DELAY_ENV, WALLETS_FILE_ENV,
};

/// Check native and token balances of a wallet list on one or all EVM networks
#[derive(Debug, Parser)]
#[command(name = "evm-checker", version)]
pub struct Cli {
    /// Network id to check, or `all` for every network
    pub selector: Option<String>,

    /// Addresses per bundled read
    #[arg(long, env = BATCH_SIZE_ENV, default_value_t = 200, allow_negative_numbers = true)]
    pub batch_size: i64,

    /// Attempts per batch before its balances are reported as 0
    #[arg(long, env = RETRY_ATTEMPTS_ENV, default_value_t = 3, allow_negative_numbers = true)]
    pub retry_attempts: i64,

    /// Milliseconds between attempts
    #[arg(long, env = RETRY_DELAY_ENV, default_value_t = 1000, allow_negative_numbers = true)]
    pub retry_delay: i64,

    /// Cap on concurrently running batches per asset (unbounded if unset)
    #[arg(long, env = MAX_IN_FLIGHT_ENV)]
    pub max_in_flight: Option<usize>,

    /// Wallet list, one address or private key per line
    #[arg(long, env = WALLETS_FILE_ENV, default_value = "wallets.txt")]
    pub wallets_file: PathBuf,

    /// Directory reports are written to
    #[arg(long, env = RESULTS_DIR_ENV, default_value = "results")]
    pub results_dir: PathBuf,

    /// Networks skipped by `all`
    #[arg(
        long = "exclude",
        env = EXCLUDED_NETWORKS_ENV,
        value_delimiter = ',',
        default_value = "base-goerli,xterio"
    )]
    pub excluded_networks: Vec<String>,

    /// Network checked when no selector is given
    #[arg(long, env = DEFAULT_NETWORK_ENV)]
    pub default_network: Option<String>,

    /// RPC endpoint override as `<network-id>=<url>`; repeatable.
    /// `RPC_URL_<NETWORK_ID>` variables are read as well.
    #[arg(long = "rpc-url", value_name = "NETWORK=URL")]
    pub rpc_urls: Vec<String>,

    /// Assets for a single-network run, e.g. `native,0x…` (default: the network's list)
    #[arg(long, value_delimiter = ',')]
    pub assets: Option<Vec<String>>,

    /// Log output format
    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}
