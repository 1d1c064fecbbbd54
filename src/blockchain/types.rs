// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use alloy::primitives::{address, Address, U256};

use super::client::ClientError;

/// Canonical Multicall3 deployment shared by most EVM networks.
pub const MULTICALL3_ADDRESS: Address = address!("0xcA11bde05977b3631167028862bE2a173976CA11");

/// Decimals assumed for an asset until the contract says otherwise.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Header used for the native asset when a network has no currency symbol.
pub const NATIVE_PLACEHOLDER: &str = "Native";

/// Literal accepted for the native asset in asset lists.
pub const NATIVE_SENTINEL: &str = "native";

/// Largest power of ten that still fits in a `U256`.
const MAX_DECIMALS: u8 = 77;

/// A token the registry already knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownToken {
    /// Column name used in reports
    pub name: &'static str,
    /// Contract address
    pub address: Address,
    /// Decimals, when known without asking the contract
    pub decimals: Option<u8>,
}

/// EVM network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Stable identifier used on the command line and in file names
    pub id: &'static str,
    /// Network name for display
    pub name: &'static str,
    /// Native currency symbol
    pub native_currency: &'static str,
    /// RPC endpoint URL
    pub rpc_url: Cow<'static, str>,
    /// Multicall3 deployment when it differs from the canonical address
    pub multicall_address: Option<Address>,
    /// Tokens checked by default, in column order
    pub tokens: &'static [KnownToken],
}

impl NetworkConfig {
    /// Replace the RPC endpoint (environment overrides).
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Cow::Owned(rpc_url.into());
        self
    }

    /// Multicall3 contract used for bundled reads on this network.
    pub fn multicall(&self) -> Address {
        self.multicall_address.unwrap_or(MULTICALL3_ADDRESS)
    }

    /// Header of the native asset column.
    pub fn native_header(&self) -> DisplayHeader {
        if self.native_currency.is_empty() {
            DisplayHeader::from(NATIVE_PLACEHOLDER)
        } else {
            DisplayHeader::from(self.native_currency)
        }
    }

    /// Whether a per-network header names the native asset.
    pub fn is_native_header(&self, header: &str) -> bool {
        header == self.native_currency || header == NATIVE_PLACEHOLDER
    }

    /// Find a known token by contract address.
    ///
    /// Address comparison is byte-wise, so checksum casing never matters.
    pub fn token_by_address(&self, token: Address) -> Option<&KnownToken> {
        self.tokens.iter().find(|t| t.address == token)
    }

    /// Find a known token by its exact registry name.
    pub fn token_by_name(&self, name: &str) -> Option<&KnownToken> {
        self.tokens.iter().find(|t| t.name == name)
    }

    /// Native asset followed by every known token.
    pub fn default_assets(&self) -> Vec<AssetRef> {
        std::iter::once(AssetRef::Native)
            .chain(self.tokens.iter().map(|t| AssetRef::Token(t.address)))
            .collect()
    }
}

/// What is being measured on one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRef {
    Native,
    Token(Address),
}

impl AssetRef {
    pub fn is_native(&self) -> bool {
        matches!(self, AssetRef::Native)
    }
}

impl FromStr for AssetRef {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(NATIVE_SENTINEL) {
            return Ok(AssetRef::Native);
        }
        Address::from_str(s)
            .map(AssetRef::Token)
            .map_err(|e| ClientError::InvalidAddress(format!("{s}: {e}")))
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRef::Native => f.write_str(NATIVE_SENTINEL),
            AssetRef::Token(address) => write!(f, "{address}"),
        }
    }
}

/// Human-readable column name of an asset in a report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayHeader(String);

impl DisplayHeader {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder for a token whose symbol could not be resolved,
    /// e.g. `Token_0xabcd`.
    pub fn placeholder(token: Address) -> Self {
        let hex = alloy::hex::encode(token);
        Self(format!("Token_0x{}", &hex[..4]))
    }
}

impl From<String> for DisplayHeader {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DisplayHeader {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for DisplayHeader {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token metadata, resolved lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
    pub address: Address,
    /// Empty until resolved
    pub symbol: String,
    pub decimals: u8,
}

impl AssetInfo {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            symbol: String::new(),
            decimals: DEFAULT_DECIMALS,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Decimals outside what a `U256` can scale are rejected.
    pub fn accepts_decimals(decimals: u8) -> bool {
        decimals <= MAX_DECIMALS
    }
}

/// Format a raw amount as a decimal string with full precision.
///
/// Zero is always `"0"`; trailing fractional zeros are trimmed.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let Some(divisor) = U256::from(10u64).checked_pow(U256::from(decimals)) else {
        return amount.to_string();
    };
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let digits = remainder.to_string();
        let decimal_str = format!("{:0>width$}", digits, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{whole}.{trimmed}")
    }
}
