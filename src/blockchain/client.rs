// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for one EVM network.

use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    signers::local::PrivateKeySigner,
};

use super::erc20::Erc20Contract;
use super::multicall::{Call3, CallBundler, CallResult, IMulticall3};
use super::types::NetworkConfig;

/// HTTP provider type (with the default fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Read-only client bound to one network's RPC endpoint.
pub struct RpcClient {
    /// Network configuration
    network: NetworkConfig,
    /// Alloy HTTP provider
    provider: HttpProvider,
}

impl RpcClient {
    /// Create a new client for the specified network.
    ///
    /// No request is sent; an unreachable endpoint surfaces on first use.
    pub fn new(network: NetworkConfig) -> Result<Self, ClientError> {
        let url: url::Url = network.rpc_url.parse().map_err(|e: url::ParseError| {
            ClientError::InvalidRpcUrl(format!("{}: {e}", network.rpc_url))
        })?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { network, provider })
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

impl CallBundler for RpcClient {
    async fn aggregate3(
        &self,
        multicall: Address,
        calls: Vec<Call3>,
    ) -> Result<Vec<CallResult>, ClientError> {
        IMulticall3::new(multicall, self.provider.clone())
            .aggregate3(calls)
            .call()
            .await
            .map_err(|e| ClientError::RpcError(e.to_string()))
    }

    async fn token_symbol(&self, token: Address) -> Result<String, ClientError> {
        Erc20Contract::new(&self.provider, token).symbol().await
    }

    async fn block_number(&self) -> Result<u64, ClientError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ClientError::RpcError(e.to_string()))
    }
}

/// Parse a signer from a hex private key (with or without `0x`).
pub fn parse_private_key(private_key_hex: &str) -> Result<PrivateKeySigner, ClientError> {
    let key_bytes = alloy::hex::decode(private_key_hex.trim())
        .map_err(|e| ClientError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ClientError::InvalidPrivateKey(e.to_string()))
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),
}
