// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory chain answering Multicall3 bundles, for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::{SolCall, SolValue},
};

use super::client::ClientError;
use super::erc20::IERC20;
use super::multicall::{Call3, CallBundler, CallResult, IMulticall3};
use super::types::MULTICALL3_ADDRESS;

#[derive(Debug, Clone, Default)]
pub struct MockToken {
    pub bundled_symbol: Option<String>,
    pub direct_symbol: Option<String>,
    pub decimals: Option<u8>,
    pub balances: HashMap<Address, U256>,
}

impl MockToken {
    pub fn new(symbol: &str, decimals: u8) -> Self {
        Self {
            bundled_symbol: Some(symbol.to_string()),
            direct_symbol: Some(symbol.to_string()),
            decimals: Some(decimals),
            balances: HashMap::new(),
        }
    }

    pub fn balance(mut self, account: Address, amount: U256) -> Self {
        self.balances.insert(account, amount);
        self
    }
}

#[derive(Debug)]
pub struct MockChain {
    multicall: Address,
    native: HashMap<Address, U256>,
    tokens: HashMap<Address, MockToken>,
    reverting: HashSet<Address>,
    garbled: HashSet<Address>,
    unavailable: HashSet<Address>,
    failures: Mutex<HashMap<Address, u32>>,
    round_trips: Mutex<HashMap<Address, u32>>,
    direct_symbol_calls: AtomicU32,
    head: Option<u64>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            multicall: MULTICALL3_ADDRESS,
            native: HashMap::new(),
            tokens: HashMap::new(),
            reverting: HashSet::new(),
            garbled: HashSet::new(),
            unavailable: HashSet::new(),
            failures: Mutex::new(HashMap::new()),
            round_trips: Mutex::new(HashMap::new()),
            direct_symbol_calls: AtomicU32::new(0),
            head: Some(1_000),
        }
    }
}

impl MockChain {
    pub fn native(mut self, account: Address, amount: U256) -> Self {
        self.native.insert(account, amount);
        self
    }

    pub fn token(mut self, address: Address, token: MockToken) -> Self {
        self.tokens.insert(address, token);
        self
    }

    /// Sub-calls about `account` revert.
    pub fn reverting(mut self, account: Address) -> Self {
        self.reverting.insert(account);
        self
    }

    /// Sub-calls about `account` succeed with undecodable data.
    pub fn garbled(mut self, account: Address) -> Self {
        self.garbled.insert(account);
        self
    }

    /// The next `times` bundles targeting `target` fail as a whole.
    pub fn failing(self, target: Address, times: u32) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(target, times);
        }
        self
    }

    /// Every bundle with a sub-call about `account` fails as a whole.
    pub fn unavailable_for(mut self, account: Address) -> Self {
        self.unavailable.insert(account);
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.head = None;
        self
    }

    /// Bundles sent to `target` so far, failed ones included.
    pub fn round_trips(&self, target: Address) -> u32 {
        self.round_trips
            .lock()
            .map(|r| r.get(&target).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn direct_symbol_calls(&self) -> u32 {
        self.direct_symbol_calls.load(Ordering::SeqCst)
    }

    /// Account a balance sub-call asks about.
    fn account_of(multicall: Address, call: &Call3) -> Option<Address> {
        let data = call.callData.as_ref();
        if call.target == multicall {
            IMulticall3::getEthBalanceCall::abi_decode(data).ok().map(|c| c.addr)
        } else {
            IERC20::balanceOfCall::abi_decode(data).ok().map(|c| c.account)
        }
    }

    fn answer(&self, multicall: Address, call: &Call3) -> CallResult {
        let data = call.callData.as_ref();
        let account_data = |account: Address, amount: U256| -> Option<Vec<u8>> {
            if self.reverting.contains(&account) {
                None
            } else if self.garbled.contains(&account) {
                Some(vec![1, 2, 3])
            } else {
                Some(amount.abi_encode())
            }
        };

        let returned = if call.target == multicall {
            IMulticall3::getEthBalanceCall::abi_decode(data).ok().and_then(|c| {
                account_data(c.addr, self.native.get(&c.addr).copied().unwrap_or_default())
            })
        } else if let Some(token) = self.tokens.get(&call.target) {
            if let Ok(c) = IERC20::balanceOfCall::abi_decode(data) {
                let amount = token.balances.get(&c.account).copied().unwrap_or_default();
                account_data(c.account, amount)
            } else if data.starts_with(&IERC20::symbolCall::SELECTOR) {
                token.bundled_symbol.clone().map(|s| (s,).abi_encode_params())
            } else if data.starts_with(&IERC20::decimalsCall::SELECTOR) {
                token.decimals.map(|d| U256::from(d).abi_encode())
            } else {
                None
            }
        } else {
            None
        };

        match returned {
            Some(bytes) => CallResult {
                success: true,
                returnData: bytes.into(),
            },
            None => CallResult {
                success: false,
                returnData: Bytes::new(),
            },
        }
    }
}

impl CallBundler for MockChain {
    async fn aggregate3(
        &self,
        multicall: Address,
        calls: Vec<Call3>,
    ) -> Result<Vec<CallResult>, ClientError> {
        let Some(target) = calls.first().map(|c| c.target) else {
            return Ok(Vec::new());
        };

        if let Ok(mut trips) = self.round_trips.lock() {
            *trips.entry(target).or_default() += 1;
        }

        let outage = match self.failures.lock() {
            Ok(mut failures) => match failures.get_mut(&target) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            },
            Err(_) => false,
        };
        let blocked = calls
            .iter()
            .filter_map(|call| Self::account_of(multicall, call))
            .any(|account| self.unavailable.contains(&account));
        if outage || blocked {
            return Err(ClientError::RpcError("mock outage".to_string()));
        }

        assert_eq!(multicall, self.multicall, "bundle sent to unexpected multicall");
        Ok(calls.iter().map(|call| self.answer(multicall, call)).collect())
    }

    async fn token_symbol(&self, token: Address) -> Result<String, ClientError> {
        self.direct_symbol_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .get(&token)
            .and_then(|t| t.direct_symbol.clone())
            .ok_or_else(|| ClientError::ContractError("execution reverted".to_string()))
    }

    async fn block_number(&self) -> Result<u64, ClientError> {
        self.head
            .ok_or_else(|| ClientError::RpcError("connection refused".to_string()))
    }
}
