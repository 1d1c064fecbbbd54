// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance providers: one bundled read per batch of addresses.

use std::collections::HashMap;
use std::future::Future;

use alloy::primitives::{Address, U256};

use crate::blockchain::erc20::{
    balance_of_call, decimals_call, decode_balance, decode_decimals, decode_symbol, symbol_call,
};
use crate::blockchain::multicall::{decode_eth_balance, eth_balance_call};
use crate::blockchain::{
    format_amount, AssetInfo, Call3, CallBundler, CallResult, ClientError, NetworkConfig,
    DEFAULT_DECIMALS,
};

use super::ZERO_BALANCE;

/// Anything that can read balances for a batch of addresses in one round trip.
pub trait BatchBalanceSource: Sync {
    /// Read balances of every address in `addresses`.
    ///
    /// The returned map has an entry for each input address. Reverted or
    /// undecodable sub-calls are recorded as `"0"`; only a failure of the
    /// round trip itself is an error.
    fn get_batch_balances(
        &self,
        addresses: &[Address],
    ) -> impl Future<Output = Result<HashMap<Address, String>, ClientError>> + Send;
}

/// Native currency balances via Multicall3 `getEthBalance`.
pub struct NativeBalanceProvider<'a, B> {
    bundler: &'a B,
    multicall: Address,
}

impl<'a, B: CallBundler> NativeBalanceProvider<'a, B> {
    pub fn new(bundler: &'a B, network: &NetworkConfig) -> Self {
        Self {
            bundler,
            multicall: network.multicall(),
        }
    }
}

impl<B: CallBundler> BatchBalanceSource for NativeBalanceProvider<'_, B> {
    async fn get_batch_balances(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, String>, ClientError> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        let calls = addresses
            .iter()
            .map(|addr| Call3::allow_failure(self.multicall, eth_balance_call(*addr)))
            .collect();
        let results = self.bundler.aggregate3(self.multicall, calls).await?;

        Ok(collect_balances(addresses, &results, decode_eth_balance, DEFAULT_DECIMALS))
    }
}

/// ERC-20 balances via bundled `balanceOf` calls.
pub struct TokenBalanceProvider<'a, B> {
    bundler: &'a B,
    multicall: Address,
    info: AssetInfo,
}

impl<'a, B: CallBundler> TokenBalanceProvider<'a, B> {
    pub fn new(bundler: &'a B, network: &NetworkConfig, token: Address) -> Self {
        Self {
            bundler,
            multicall: network.multicall(),
            info: AssetInfo::new(token),
        }
    }

    /// Use known decimals instead of asking the contract.
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.info = self.info.with_decimals(decimals);
        self
    }

    pub fn info(&self) -> &AssetInfo {
        &self.info
    }

    /// Resolve symbol and decimals.
    ///
    /// Reads both in one bundle. If that yields no usable symbol, `symbol()` is
    /// called directly. Never fails: whatever cannot be resolved keeps its
    /// default (empty symbol, 18 decimals).
    pub async fn initialize(&mut self) {
        let token = self.info.address;
        let calls = vec![
            Call3::allow_failure(token, symbol_call()),
            Call3::allow_failure(token, decimals_call()),
        ];

        match self.bundler.aggregate3(self.multicall, calls).await {
            Ok(results) => {
                let symbol = results.first().and_then(CallResult::data).and_then(decode_symbol);
                if let Some(symbol) = symbol {
                    self.info.symbol = symbol;
                }
                match results.get(1).and_then(CallResult::data).and_then(decode_decimals) {
                    Some(decimals) if AssetInfo::accepts_decimals(decimals) => {
                        self.info.decimals = decimals;
                    }
                    Some(decimals) => {
                        tracing::warn!(token = %token, decimals, "Ignoring out-of-range decimals");
                    }
                    None => {}
                }
            }
            Err(e) => {
                tracing::debug!(token = %token, error = %e, "Bundled metadata read failed");
            }
        }

        if usable_symbol(&self.info.symbol) {
            return;
        }

        match self.bundler.token_symbol(token).await {
            Ok(symbol) if usable_symbol(&symbol) => self.info.symbol = symbol,
            Ok(_) => self.info.symbol.clear(),
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "Could not resolve token symbol");
                self.info.symbol.clear();
            }
        }
    }
}

impl<B: CallBundler> BatchBalanceSource for TokenBalanceProvider<'_, B> {
    async fn get_batch_balances(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, String>, ClientError> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        let token = self.info.address;
        let calls = addresses
            .iter()
            .map(|addr| Call3::allow_failure(token, balance_of_call(*addr)))
            .collect();
        let results = self.bundler.aggregate3(self.multicall, calls).await?;

        Ok(collect_balances(addresses, &results, decode_balance, self.info.decimals))
    }
}

/// Provider for one asset column.
pub enum BalanceProvider<'a, B> {
    Native(NativeBalanceProvider<'a, B>),
    Token(TokenBalanceProvider<'a, B>),
}

impl<B: CallBundler> BalanceProvider<'_, B> {
    /// Balance of a single address, read through the batch path.
    pub async fn get_balance(&self, address: Address) -> Result<String, ClientError> {
        let mut balances = self.get_batch_balances(&[address]).await?;
        Ok(balances
            .remove(&address)
            .unwrap_or_else(|| ZERO_BALANCE.to_string()))
    }
}

impl<B: CallBundler> BatchBalanceSource for BalanceProvider<'_, B> {
    async fn get_batch_balances(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, String>, ClientError> {
        match self {
            BalanceProvider::Native(provider) => provider.get_batch_balances(addresses).await,
            BalanceProvider::Token(provider) => provider.get_batch_balances(addresses).await,
        }
    }
}

fn usable_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol != ZERO_BALANCE
}

/// Pair each address with its sub-call result. Missing, reverted and
/// undecodable results become `"0"`.
fn collect_balances(
    addresses: &[Address],
    results: &[CallResult],
    decode: fn(&[u8]) -> Option<U256>,
    decimals: u8,
) -> HashMap<Address, String> {
    addresses
        .iter()
        .enumerate()
        .map(|(i, addr)| {
            let balance = results
                .get(i)
                .and_then(CallResult::data)
                .and_then(decode)
                .map(|amount| format_amount(amount, decimals))
                .unwrap_or_else(|| ZERO_BALANCE.to_string());
            (*addr, balance)
        })
        .collect()
}
