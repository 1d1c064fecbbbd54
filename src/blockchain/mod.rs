// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for EVM networks.
//!
//! This module provides functionality for:
//! - The built-in network registry
//! - Multicall3 bundled reads (native and ERC-20 balances, token metadata)
//! - Direct ERC-20 calls for metadata fallbacks

pub mod client;
pub mod erc20;
pub mod multicall;
pub mod networks;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{parse_private_key, ClientError, RpcClient};
pub use multicall::{Call3, CallBundler, CallResult};
pub use networks::{find_network, networks_for_all_run, DEFAULT_EXCLUDED_NETWORKS, NETWORKS};
pub use types::*;
