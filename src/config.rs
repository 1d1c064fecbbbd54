// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Settings come from command line flags, each of which falls back to an
//! environment variable. A `.env` file in the working directory is loaded
//! first and only fills variables that are not already set. Everything is
//! validated before any network I/O.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BATCH_SIZE` | Addresses per bundled read (positive) | `200` |
//! | `RETRY_ATTEMPTS` | Attempts per batch (non-negative, 0 acts as 1) | `3` |
//! | `RETRY_DELAY` | Milliseconds between attempts (non-negative) | `1000` |
//! | `MAX_IN_FLIGHT` | Concurrent batches per asset | Unbounded |
//! | `WALLETS_FILE` | Wallet list path | `wallets.txt` |
//! | `RESULTS_DIR` | Report output directory | `results` |
//! | `EXCLUDED_NETWORKS` | Comma-separated ids skipped by `all` | `base-goerli,xterio` |
//! | `DEFAULT_NETWORK` | Network used when no selector is given | Interactive prompt |
//! | `RPC_URL_<NETWORK_ID>` | RPC override, id upper-cased with `-` as `_` | Registry URL |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! Any of these may also be written as `KEY=value` lines in `.env`.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::blockchain::{find_network, networks_for_all_run, AssetRef, NetworkConfig, NETWORKS};
use crate::checker::CheckerOptions;
use crate::cli::Cli;

pub const BATCH_SIZE_ENV: &str = "BATCH_SIZE";
pub const RETRY_ATTEMPTS_ENV: &str = "RETRY_ATTEMPTS";
pub const RETRY_DELAY_ENV: &str = "RETRY_DELAY";
pub const MAX_IN_FLIGHT_ENV: &str = "MAX_IN_FLIGHT";
pub const WALLETS_FILE_ENV: &str = "WALLETS_FILE";
pub const RESULTS_DIR_ENV: &str = "RESULTS_DIR";
pub const EXCLUDED_NETWORKS_ENV: &str = "EXCLUDED_NETWORKS";
pub const DEFAULT_NETWORK_ENV: &str = "DEFAULT_NETWORK";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Settings file read from the working directory before flags are parsed.
pub const ENV_FILE: &str = ".env";

/// Prefix of per-network RPC override variables, e.g. `RPC_URL_BASE_GOERLI`.
pub const RPC_URL_ENV_PREFIX: &str = "RPC_URL_";

/// Selector that checks every network.
pub const ALL_NETWORKS: &str = "all";

/// What a run checks.
#[derive(Debug, Clone)]
pub enum Selection {
    Network(NetworkConfig),
    All,
}

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub options: CheckerOptions,
    pub wallets_file: PathBuf,
    pub results_dir: PathBuf,
    /// Lower-cased ids skipped by the all-networks run
    pub excluded_networks: Vec<String>,
    pub default_network: Option<String>,
    /// RPC overrides keyed by network id
    pub rpc_overrides: HashMap<&'static str, String>,
    /// Assets of a single-network run, `None` for the network's defaults
    pub assets: Option<Vec<AssetRef>>,
}

impl AppConfig {
    /// Build and validate the configuration.
    ///
    /// `env` supplies the `RPC_URL_<NETWORK_ID>` variables; flags given with
    /// `--rpc-url` take precedence over them.
    pub fn from_cli(
        cli: &Cli,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let batch_size = usize::try_from(cli.batch_size)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidBatchSize(cli.batch_size))?;
        let retry_attempts = u32::try_from(cli.retry_attempts)
            .map_err(|_| ConfigError::InvalidRetryAttempts(cli.retry_attempts))?;
        let retry_delay = u64::try_from(cli.retry_delay)
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidRetryDelay(cli.retry_delay))?;
        let max_in_flight = cli
            .max_in_flight
            .map(|n| NonZeroUsize::new(n).ok_or(ConfigError::InvalidMaxInFlight))
            .transpose()?;

        if cli.wallets_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath(WALLETS_FILE_ENV));
        }
        if cli.results_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath(RESULTS_DIR_ENV));
        }

        let default_network = cli
            .default_network
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| {
                find_network(id)
                    .map(|n| n.id.to_string())
                    .ok_or_else(|| ConfigError::UnknownNetwork(id.to_string()))
            })
            .transpose()?;

        let assets = cli
            .assets
            .as_ref()
            .map(|assets| {
                assets
                    .iter()
                    .filter(|a| !a.trim().is_empty())
                    .map(|a| {
                        a.parse::<AssetRef>()
                            .map_err(|_| ConfigError::InvalidAsset(a.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        if assets.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::InvalidAsset(String::new()));
        }

        let mut rpc_overrides = rpc_overrides_from_env(env);
        for flag in &cli.rpc_urls {
            let (id, url) = flag
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidRpcOverride(flag.clone()))?;
            let network =
                find_network(id).ok_or_else(|| ConfigError::UnknownNetwork(id.to_string()))?;
            rpc_overrides.insert(network.id, url.trim().to_string());
        }
        if let Some((id, _)) = rpc_overrides.iter().find(|(_, url)| url.is_empty()) {
            return Err(ConfigError::MissingRpcUrl(id.to_string()));
        }

        let config = Self {
            options: CheckerOptions {
                batch_size,
                retry_attempts,
                retry_delay,
                max_in_flight,
            },
            wallets_file: cli.wallets_file.clone(),
            results_dir: cli.results_dir.clone(),
            excluded_networks: cli
                .excluded_networks
                .iter()
                .map(|id| id.trim().to_lowercase())
                .filter(|id| !id.is_empty())
                .collect(),
            default_network,
            rpc_overrides,
            assets,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that do not depend on how the configuration was built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.options.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(0));
        }
        if let Some(network) = NETWORKS.iter().find(|n| self.rpc_url(n).is_empty()) {
            return Err(ConfigError::MissingRpcUrl(network.id.to_string()));
        }
        Ok(())
    }

    /// Resolve an explicit selector: a network id or `all`.
    pub fn select(&self, selector: &str) -> Result<Selection, ConfigError> {
        let selector = selector.trim();
        if selector.eq_ignore_ascii_case(ALL_NETWORKS) {
            return Ok(Selection::All);
        }
        self.network(selector).map(Selection::Network)
    }

    /// Selection when no selector is given: the default network if one is
    /// configured, otherwise `None` (ask the user).
    pub fn default_selection(&self) -> Result<Option<Selection>, ConfigError> {
        self.default_network
            .as_deref()
            .map(|id| self.select(id))
            .transpose()
    }

    /// A registry network with its RPC override applied.
    pub fn network(&self, id: &str) -> Result<NetworkConfig, ConfigError> {
        find_network(id)
            .map(|n| self.apply_override(n))
            .ok_or_else(|| ConfigError::UnknownNetwork(id.to_string()))
    }

    /// Networks of an all-networks run, in check order, overrides applied.
    pub fn all_networks(&self) -> Vec<NetworkConfig> {
        networks_for_all_run(&self.excluded_networks)
            .into_iter()
            .map(|n| match self.rpc_overrides.get(n.id) {
                Some(url) => n.with_rpc_url(url.clone()),
                None => n,
            })
            .collect()
    }

    fn rpc_url<'a>(&'a self, network: &'a NetworkConfig) -> &'a str {
        self.rpc_overrides
            .get(network.id)
            .map(String::as_str)
            .unwrap_or(network.rpc_url.as_ref())
    }

    fn apply_override(&self, network: &NetworkConfig) -> NetworkConfig {
        match self.rpc_overrides.get(network.id) {
            Some(url) => network.clone().with_rpc_url(url.clone()),
            None => network.clone(),
        }
    }
}

/// Load `KEY=value` lines from `path` into the process environment.
///
/// Variables already present keep their value. Returns `Ok(false)` when the
/// file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool, dotenv::Error> {
    match dotenv::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Name of the override variable for a network id.
pub fn rpc_url_env_name(network_id: &str) -> String {
    format!(
        "{RPC_URL_ENV_PREFIX}{}",
        network_id.to_uppercase().replace('-', "_")
    )
}

fn rpc_overrides_from_env(
    env: impl IntoIterator<Item = (String, String)>,
) -> HashMap<&'static str, String> {
    let mut overrides = HashMap::new();
    for (key, value) in env {
        if !key.starts_with(RPC_URL_ENV_PREFIX) {
            continue;
        }
        match NETWORKS.iter().find(|n| rpc_url_env_name(n.id) == key) {
            Some(network) => {
                tracing::debug!(network = network.id, "Using RPC override from environment");
                overrides.insert(network.id, value.trim().to_string());
            }
            None => tracing::warn!(variable = %key, "Ignoring RPC override for unknown network"),
        }
    }
    overrides
}

/// Configuration errors, all fatal before any network I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid batch size {0}: must be a positive integer")]
    InvalidBatchSize(i64),

    #[error("Invalid retry attempts {0}: must not be negative")]
    InvalidRetryAttempts(i64),

    #[error("Invalid retry delay {0}: must not be negative")]
    InvalidRetryDelay(i64),

    #[error("Invalid max in flight: must be positive")]
    InvalidMaxInFlight,

    #[error("Empty path for {0}")]
    EmptyPath(&'static str),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Missing RPC URL for network {0}")]
    MissingRpcUrl(String),

    #[error("Invalid RPC override {0:?}: expected <network-id>=<url>")]
    InvalidRpcOverride(String),

    #[error("Invalid asset {0:?}: expected `native` or a 0x address")]
    InvalidAsset(String),
}
