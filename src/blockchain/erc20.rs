// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions.
//!
//! Calldata builders and return-data decoders are used inside Multicall3
//! bundles; [`Erc20Contract`] is the direct, unbundled path.

use alloy::{
    primitives::{Address, Bytes, U256},
    providers::Provider,
    sol,
    sol_types::SolCall,
};

use super::client::ClientError;

// Read-only subset of the ERC-20 interface
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Calldata for `balanceOf(account)`.
pub fn balance_of_call(account: Address) -> Bytes {
    IERC20::balanceOfCall { account }.abi_encode().into()
}

/// Calldata for `symbol()`.
pub fn symbol_call() -> Bytes {
    IERC20::symbolCall {}.abi_encode().into()
}

/// Calldata for `decimals()`.
pub fn decimals_call() -> Bytes {
    IERC20::decimalsCall {}.abi_encode().into()
}

/// Decode `balanceOf` return data. Empty or malformed data yields `None`.
pub fn decode_balance(data: &[u8]) -> Option<U256> {
    IERC20::balanceOfCall::abi_decode_returns(data).ok()
}

/// Decode `symbol()` return data.
pub fn decode_symbol(data: &[u8]) -> Option<String> {
    IERC20::symbolCall::abi_decode_returns(data).ok()
}

/// Decode `decimals()` return data.
pub fn decode_decimals(data: &[u8]) -> Option<u8> {
    IERC20::decimalsCall::abi_decode_returns(data).ok()
}

/// ERC-20 contract wrapper for direct calls.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    /// Create a new ERC-20 contract instance.
    pub fn new(provider: &P, address: Address) -> Self {
        Self {
            contract: IERC20::new(address, provider.clone()),
        }
    }

    /// Get the token symbol.
    pub async fn symbol(&self) -> Result<String, ClientError> {
        self.contract
            .symbol()
            .call()
            .await
            .map_err(|e| ClientError::ContractError(e.to_string()))
    }
}
