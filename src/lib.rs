// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM Balance Checker
//!
//! Reads native and ERC-20 balances of a wallet list through Multicall3, on
//! one network or on every known network in turn, and writes `;`-delimited
//! reports.
//!
//! ## Modules
//!
//! - `blockchain` - Network registry, Multicall3 and ERC-20 bindings, RPC client
//! - `checker` - Batched reads with retries, per-network and multi-network checks
//! - `report` - Single-network tables, cross-network merge, file export
//! - `config` / `cli` - Flags, environment and validation
//! - `wallets` - Wallet list loading

pub mod blockchain;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod wallets;

use crate::blockchain::{NetworkConfig, RpcClient};
use crate::checker::{LogProgress, MultiNetworkChecker, NetworkChecker, RunSummary};
use crate::config::{AppConfig, Selection};
use crate::error::CheckerError;
use crate::report::ReportExporter;

/// Run one check as selected and export its report.
///
/// The wallet list is loaded and checked for emptiness before any network
/// I/O happens.
pub async fn run(config: &AppConfig, selection: Selection) -> Result<RunSummary, CheckerError> {
    let accounts =
        wallets::load_wallets(&config.wallets_file).map_err(|source| CheckerError::Wallets {
            path: config.wallets_file.display().to_string(),
            source,
        })?;
    if accounts.is_empty() {
        return Err(CheckerError::NoWallets(config.wallets_file.display().to_string()));
    }

    let exporter = ReportExporter::new(&config.results_dir);

    match selection {
        Selection::Network(network) => {
            let client = RpcClient::new(network)?;
            let mut checker =
                NetworkChecker::new(client.network().clone(), &client, &accounts, &config.options)
                    .with_progress(&LogProgress);
            if let Some(assets) = &config.assets {
                checker = checker.with_assets(assets.iter().copied());
            }

            let report = checker.run().await;
            exporter.export_single(&report)?;
            Ok(RunSummary::from_reports(std::slice::from_ref(&report)))
        }
        Selection::All => {
            if config.assets.is_some() {
                tracing::warn!("Asset list ignored: every network uses its own tokens");
            }

            let networks = config.all_networks();
            let connect = |network: &NetworkConfig| RpcClient::new(network.clone());
            let reports = MultiNetworkChecker::new(networks, &accounts, &config.options, connect)
                .with_progress(&LogProgress)
                .run()
                .await;

            exporter.export_all(&reports)?;
            Ok(RunSummary::from_reports(&reports))
        }
    }
}
