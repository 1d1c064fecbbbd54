// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Multicall3 call bundling.
//!
//! Every batched read goes through `aggregate3` with `allowFailure = true`, so a
//! reverting sub-call comes back as `success = false` instead of failing the
//! whole round trip.

use std::future::Future;

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};

use super::client::ClientError;

sol! {
    #[sol(rpc)]
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct CallResult {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls)
            external
            payable
            returns (CallResult[] memory returnData);
        function getEthBalance(address addr) external view returns (uint256 balance);
    }
}

pub use IMulticall3::{Call3, CallResult};

impl Call3 {
    /// A sub-call whose revert does not abort the bundle.
    pub fn allow_failure(target: Address, call_data: Bytes) -> Self {
        Self {
            target,
            allowFailure: true,
            callData: call_data,
        }
    }
}

impl CallResult {
    /// Return data of a successful sub-call, `None` for reverts and empty data.
    pub fn data(&self) -> Option<&[u8]> {
        (self.success && !self.returnData.is_empty()).then_some(self.returnData.as_ref())
    }
}

/// Calldata for Multicall3 `getEthBalance(addr)`.
pub fn eth_balance_call(addr: Address) -> Bytes {
    IMulticall3::getEthBalanceCall { addr }.abi_encode().into()
}

/// Decode `getEthBalance` return data.
pub fn decode_eth_balance(data: &[u8]) -> Option<U256> {
    IMulticall3::getEthBalanceCall::abi_decode_returns(data).ok()
}

/// Transport for bundled and direct contract reads on one network.
///
/// Implemented by [`super::RpcClient`]; tests substitute an in-memory chain.
pub trait CallBundler: Send + Sync {
    /// Execute all `calls` in one `aggregate3` round trip against `multicall`.
    ///
    /// The returned vector is positionally aligned with `calls`.
    fn aggregate3(
        &self,
        multicall: Address,
        calls: Vec<Call3>,
    ) -> impl Future<Output = Result<Vec<CallResult>, ClientError>> + Send;

    /// Direct `symbol()` call, bypassing Multicall3.
    fn token_symbol(
        &self,
        token: Address,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;

    /// Current chain head.
    fn block_number(&self) -> impl Future<Output = Result<u64, ClientError>> + Send;
}
