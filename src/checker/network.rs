// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance check of one network.
//!
//! A [`NetworkChecker`] moves through `Idle → ResolvingAssets →
//! CheckingBalances → Done` exactly once; [`NetworkChecker::run`] consumes it.
//! Each transition out of `Idle` is reported as [`Progress::StateChanged`].

use std::collections::HashMap;
use std::time::Instant;

use alloy::primitives::Address;
use futures::stream::{self, StreamExt};

use crate::blockchain::{AssetRef, CallBundler, ClientError, DisplayHeader, NetworkConfig};

use super::batch::BatchRetryExecutor;
use super::provider::{BalanceProvider, NativeBalanceProvider, TokenBalanceProvider};
use super::{
    Account, AssetColumn, BalanceRecord, CheckStats, CheckerOptions, NetworkReport, NoProgress,
    Progress, ProgressSink, ZERO_BALANCE,
};

/// Where a [`NetworkChecker`] is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Idle,
    ResolvingAssets,
    CheckingBalances,
    Done,
}

/// Checks every requested asset for every account on one network.
pub struct NetworkChecker<'a, B> {
    network: NetworkConfig,
    bundler: &'a B,
    accounts: &'a [Account],
    assets: Vec<AssetRef>,
    executor: BatchRetryExecutor,
    progress: &'a dyn ProgressSink,
}

impl<'a, B: CallBundler> NetworkChecker<'a, B> {
    /// Checker for the network's default assets (native, then known tokens).
    pub fn new(
        network: NetworkConfig,
        bundler: &'a B,
        accounts: &'a [Account],
        options: &CheckerOptions,
    ) -> Self {
        let assets = network.default_assets();
        Self {
            network,
            bundler,
            accounts,
            assets,
            executor: BatchRetryExecutor::new(options),
            progress: &NoProgress,
        }
    }

    /// Check `assets` instead of the defaults. Repeated assets are dropped.
    pub fn with_assets(mut self, assets: impl IntoIterator<Item = AssetRef>) -> Self {
        let mut unique = Vec::new();
        for asset in assets {
            if !unique.contains(&asset) {
                unique.push(asset);
            }
        }
        self.assets = unique;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Run the check. Always produces a report with one record per account
    /// and one balance per requested asset.
    pub async fn run(self) -> NetworkReport {
        let started = Instant::now();
        tracing::info!(
            network = %self.network.name,
            accounts = self.accounts.len(),
            assets = self.assets.len(),
            "Checking network"
        );

        self.enter(CheckState::ResolvingAssets);
        let providers = self.resolve_assets().await;
        let columns: Vec<AssetColumn> =
            providers.iter().map(|(column, _)| column.clone()).collect();

        self.enter(CheckState::CheckingBalances);
        let (results, mut stats) = self.check_balances(&providers).await;
        stats.duration = started.elapsed();

        self.enter(CheckState::Done);
        tracing::info!(
            network = %self.network.name,
            successful = stats.successful_checks,
            failed = stats.failed_checks,
            duration_ms = stats.duration.as_millis() as u64,
            "Network check complete"
        );

        NetworkReport {
            network: self.network,
            columns,
            results,
            stats,
        }
    }

    fn enter(&self, state: CheckState) {
        self.progress.notify(Progress::StateChanged {
            network: self.network.id,
            state,
        });
    }

    /// Resolve a header and a provider for every asset, in input order.
    async fn resolve_assets(&self) -> Vec<(AssetColumn, BalanceProvider<'a, B>)> {
        let total = self.assets.len();
        let mut providers = Vec::with_capacity(total);

        for (index, asset) in self.assets.iter().enumerate() {
            let (header, provider) = self.resolve_asset(*asset).await;
            self.progress.notify(Progress::AssetResolved {
                network: self.network.id,
                header: header.clone(),
                completed: index + 1,
                total,
            });
            providers.push((
                AssetColumn {
                    asset: *asset,
                    header,
                },
                provider,
            ));
        }

        providers
    }

    async fn resolve_asset(&self, asset: AssetRef) -> (DisplayHeader, BalanceProvider<'a, B>) {
        let token = match asset {
            AssetRef::Native => {
                return (
                    self.network.native_header(),
                    BalanceProvider::Native(NativeBalanceProvider::new(
                        self.bundler,
                        &self.network,
                    )),
                );
            }
            AssetRef::Token(token) => token,
        };

        let mut provider = TokenBalanceProvider::new(self.bundler, &self.network, token);

        // Known tokens need no RPC at all
        if let Some(known) = self.network.token_by_address(token) {
            if let Some(decimals) = known.decimals {
                provider = provider.with_decimals(decimals);
            }
            return (DisplayHeader::from(known.name), BalanceProvider::Token(provider));
        }

        provider.initialize().await;
        let header = if provider.info().symbol.is_empty() {
            tracing::warn!(
                network = %self.network.name,
                token = %token,
                "Token symbol unresolved, using placeholder"
            );
            DisplayHeader::placeholder(token)
        } else {
            DisplayHeader::from(provider.info().symbol.clone())
        };

        (header, BalanceProvider::Token(provider))
    }

    /// Read every asset concurrently and write each outcome into the records.
    async fn check_balances(
        &self,
        providers: &[(AssetColumn, BalanceProvider<'a, B>)],
    ) -> (Vec<BalanceRecord>, CheckStats) {
        let addresses: Vec<Address> = self.accounts.iter().map(|a| a.address).collect();
        let mut records: Vec<BalanceRecord> =
            self.accounts.iter().cloned().map(BalanceRecord::new).collect();
        let mut stats = CheckStats {
            total_accounts: self.accounts.len(),
            total_assets: providers.len(),
            ..CheckStats::default()
        };

        let total = providers.len() * addresses.len();
        let mut completed = 0;
        let executor = &self.executor;
        let addresses = addresses.as_slice();

        let mut outcomes = stream::iter(providers)
            .map(|(column, provider)| async move {
                (column, executor.execute(provider, addresses).await)
            })
            .buffer_unordered(providers.len().max(1));

        while let Some((column, outcome)) = outcomes.next().await {
            let failed: HashMap<Address, &ClientError> = outcome
                .failed
                .iter()
                .flat_map(|batch| batch.addresses.iter().map(move |a| (*a, &batch.error)))
                .collect();

            for record in records.iter_mut() {
                let address = record.account.address;
                let balance = match failed.get(&address) {
                    Some(error) => {
                        record.errors.insert(column.asset, (*error).clone());
                        stats.failed_checks += 1;
                        ZERO_BALANCE.to_string()
                    }
                    None => {
                        stats.successful_checks += 1;
                        outcome
                            .balances
                            .get(&address)
                            .cloned()
                            .unwrap_or_else(|| ZERO_BALANCE.to_string())
                    }
                };
                record.balances.insert(column.asset, balance);
            }

            if !outcome.failed.is_empty() {
                tracing::warn!(
                    network = %self.network.name,
                    asset = %column.header,
                    failed = outcome.failed_addresses(),
                    "Some balances could not be read and are reported as 0"
                );
            }

            completed += addresses.len();
            self.progress.notify(Progress::AssetChecked {
                network: self.network.id,
                header: column.header.clone(),
                completed,
                total,
            });
        }

        (records, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use alloy::primitives::U256;

    use crate::blockchain::mock::{MockChain, MockToken};
    use crate::blockchain::{find_network, NetworkConfig};

    const ONE_ETH: u64 = 1_000_000_000_000_000_000;

    fn base() -> NetworkConfig {
        find_network("base").unwrap().clone()
    }

    fn options(retry_attempts: u32) -> CheckerOptions {
        CheckerOptions {
            batch_size: 200,
            retry_attempts,
            retry_delay: Duration::from_millis(1000),
            max_in_flight: None,
        }
    }

    fn accounts(n: u8) -> Vec<Account> {
        (1..=n).map(|i| Account::watch(Address::repeat_byte(i))).collect()
    }

    #[tokio::test]
    async fn native_scenario() {
        let x = Address::repeat_byte(1);
        let chain = MockChain::default().native(x, U256::from(ONE_ETH + ONE_ETH / 2));
        let accounts = accounts(2);

        let report = NetworkChecker::new(base(), &chain, &accounts, &options(3))
            .with_assets([AssetRef::Native])
            .run()
            .await;

        assert_eq!(report.columns.len(), 1);
        assert_eq!(report.columns[0].header.as_str(), "ETH");
        assert_eq!(report.results[0].balance(&AssetRef::Native), "1.5");
        assert_eq!(report.results[1].balance(&AssetRef::Native), "0");
        assert_eq!(report.stats.successful_checks, 2);
        assert_eq!(report.stats.failed_checks, 0);
        assert_eq!(report.accounts_with_balance(), 1);
    }

    #[tokio::test]
    async fn records_hold_exactly_the_requested_assets() {
        let network = base();
        let known = network.tokens[0].address;
        let unknown = Address::repeat_byte(0xee);
        let chain = MockChain::default().token(unknown, MockToken::new("FOO", 6));
        let accounts = accounts(3);
        let assets = [
            AssetRef::Native,
            AssetRef::Token(known),
            AssetRef::Token(unknown),
            AssetRef::Native,
        ];

        let report = NetworkChecker::new(network, &chain, &accounts, &options(3))
            .with_assets(assets)
            .run()
            .await;

        let expected: Vec<AssetRef> = vec![
            AssetRef::Native,
            AssetRef::Token(known),
            AssetRef::Token(unknown),
        ];
        assert_eq!(report.columns.iter().map(|c| c.asset).collect::<Vec<_>>(), expected);
        assert_eq!(report.results.len(), 3);
        for record in &report.results {
            assert_eq!(record.balances.len(), expected.len());
            assert!(expected.iter().all(|a| record.balances.contains_key(a)));
        }
        assert_eq!(report.stats.total_accounts, 3);
        assert_eq!(report.stats.total_assets, 3);
        assert_eq!(report.stats.total_checks(), 9);
    }

    #[tokio::test]
    async fn known_tokens_resolve_without_rpc() {
        let network = base();
        let known = network.tokens[0];
        let chain = MockChain::default();
        let accounts = accounts(1);

        let report = NetworkChecker::new(network, &chain, &accounts, &options(3))
            .with_assets([AssetRef::Token(known.address)])
            .run()
            .await;

        assert_eq!(report.columns[0].header.as_str(), known.name);
        // Only the balance bundle, no metadata read
        assert_eq!(chain.round_trips(known.address), 1);
        assert_eq!(chain.direct_symbol_calls(), 0);
    }

    #[tokio::test]
    async fn unresolvable_token_gets_placeholder_header() {
        let token: Address = "0xabcdef0123456789abcdef0123456789abcdef01".parse().unwrap();
        let chain = MockChain::default();
        let accounts = accounts(2);

        let report = NetworkChecker::new(base(), &chain, &accounts, &options(3))
            .with_assets([AssetRef::Native, AssetRef::Token(token)])
            .run()
            .await;

        assert_eq!(report.columns[1].header.as_str(), "Token_0xabcd");
        assert!(report.results.iter().all(|r| r.balance(&AssetRef::Token(token)) == "0"));
    }

    #[tokio::test]
    async fn unknown_token_uses_resolved_symbol() {
        let token = Address::repeat_byte(0xdd);
        let pepe = MockToken::new("PEPE", 6)
            .balance(Address::repeat_byte(1), U256::from(42_000_000u64));
        let chain = MockChain::default().token(token, pepe);
        let accounts = accounts(1);

        let report = NetworkChecker::new(base(), &chain, &accounts, &options(3))
            .with_assets([AssetRef::Token(token)])
            .run()
            .await;

        assert_eq!(report.columns[0].header.as_str(), "PEPE");
        assert_eq!(report.results[0].balance(&AssetRef::Token(token)), "42");
    }

    #[tokio::test(start_paused = true)]
    async fn retried_asset_records_no_error() {
        let network = base();
        let chain = MockChain::default()
            .native(Address::repeat_byte(1), U256::from(ONE_ETH))
            .failing(network.multicall(), 2);
        let accounts = accounts(2);

        let report = NetworkChecker::new(network, &chain, &accounts, &options(3))
            .with_assets([AssetRef::Native])
            .run()
            .await;

        assert_eq!(report.results[0].balance(&AssetRef::Native), "1");
        assert!(report.results.iter().all(|r| r.errors.is_empty()));
        assert_eq!(report.stats.failed_checks, 0);
        assert_eq!(report.stats.successful_checks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_asset_degrades_to_zero() {
        let network = base();
        let token = network.tokens[0].address;
        let chain = MockChain::default()
            .native(Address::repeat_byte(1), U256::from(ONE_ETH))
            .failing(token, 3);
        let accounts = accounts(3);

        let report = NetworkChecker::new(network, &chain, &accounts, &options(3))
            .with_assets([AssetRef::Native, AssetRef::Token(token)])
            .run()
            .await;

        let asset = AssetRef::Token(token);
        for record in &report.results {
            assert_eq!(record.balance(&asset), "0");
            assert!(matches!(record.errors.get(&asset), Some(ClientError::RpcError(_))));
            assert!(!record.errors.contains_key(&AssetRef::Native));
        }
        assert_eq!(report.results[0].balance(&AssetRef::Native), "1");
        assert_eq!(report.stats.failed_checks, 3);
        assert_eq!(report.stats.successful_checks, 3);
        assert_eq!(chain.round_trips(token), 3);
    }

    #[tokio::test]
    async fn reports_progress_per_asset() {
        let chain = MockChain::default();
        let accounts = accounts(2);
        let seen = Mutex::new(Vec::new());
        let sink = |p: Progress| seen.lock().unwrap().push(p);

        NetworkChecker::new(base(), &chain, &accounts, &options(3))
            .with_assets([AssetRef::Native])
            .with_progress(&sink)
            .run()
            .await;

        let seen = seen.into_inner().unwrap();
        let state = |state| Progress::StateChanged {
            network: "base",
            state,
        };
        assert_eq!(
            seen,
            vec![
                state(CheckState::ResolvingAssets),
                Progress::AssetResolved {
                    network: "base",
                    header: DisplayHeader::from("ETH"),
                    completed: 1,
                    total: 1,
                },
                state(CheckState::CheckingBalances),
                Progress::AssetChecked {
                    network: "base",
                    header: DisplayHeader::from("ETH"),
                    completed: 2,
                    total: 2,
                },
                state(CheckState::Done),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_batch_zeroes_only_its_accounts() {
        let network = base();
        let down = Address::repeat_byte(1);
        let mut chain = MockChain::default().unavailable_for(down);
        for i in 1..=5 {
            chain = chain.native(Address::repeat_byte(i), U256::from(ONE_ETH));
        }
        let accounts = accounts(5);
        let options = CheckerOptions {
            batch_size: 2,
            ..options(3)
        };

        let report = NetworkChecker::new(network, &chain, &accounts, &options)
            .with_assets([AssetRef::Native])
            .run()
            .await;

        let balances: Vec<&str> = report
            .results
            .iter()
            .map(|r| r.balance(&AssetRef::Native))
            .collect();
        assert_eq!(balances, vec!["0", "0", "1", "1", "1"]);

        let errors: Vec<bool> = report
            .results
            .iter()
            .map(|r| r.errors.contains_key(&AssetRef::Native))
            .collect();
        assert_eq!(errors, vec![true, true, false, false, false]);

        assert_eq!(report.stats.failed_checks, 2);
        assert_eq!(report.stats.successful_checks, 3);
    }
}
