// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Checking
//!
//! Turns (network, accounts, assets) into per-account balance records.
//!
//! ## Layers
//!
//! 1. [`provider`]: one bundled Multicall3 read for a batch of addresses
//!    against one asset.
//! 2. [`batch`]: splits an address list into batches, runs them concurrently
//!    and retries each failing batch.
//! 3. [`network`]: resolves column headers and fans out over all assets of
//!    one network.
//! 4. [`multi`]: walks many networks one after the other, skipping those that
//!    cannot be reached.

pub mod batch;
pub mod multi;
pub mod network;
pub mod provider;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

use alloy::primitives::Address;

use crate::blockchain::{AssetRef, ClientError, DisplayHeader, NetworkConfig};

pub use batch::{with_retry, BatchOutcome, BatchRetryExecutor, FailedBatch, RetryPolicy};
pub use multi::MultiNetworkChecker;
pub use network::{CheckState, NetworkChecker};
pub use provider::{
    BalanceProvider, BatchBalanceSource, NativeBalanceProvider, TokenBalanceProvider,
};

/// Balance string recorded whenever a value is unknown.
pub const ZERO_BALANCE: &str = "0";

/// An account to check. The address is the identity across networks.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
    /// Private key the address was derived from, when the wallet list had one
    pub secret: Option<String>,
}

impl Account {
    pub fn watch(address: Address) -> Self {
        Self {
            address,
            secret: None,
        }
    }

    pub fn with_secret(address: Address, secret: impl Into<String>) -> Self {
        Self {
            address,
            secret: Some(secret.into()),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Balances of one account on one network.
#[derive(Debug, Clone)]
pub struct BalanceRecord {
    pub account: Account,
    /// Decimal balance per requested asset
    pub balances: HashMap<AssetRef, String>,
    /// Why an asset's balance fell back to zero
    pub errors: HashMap<AssetRef, ClientError>,
}

impl BalanceRecord {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            balances: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    /// Balance of `asset`, `"0"` when absent.
    pub fn balance(&self, asset: &AssetRef) -> &str {
        self.balances
            .get(asset)
            .map(String::as_str)
            .unwrap_or(ZERO_BALANCE)
    }

    pub fn has_balance(&self) -> bool {
        self.balances.values().any(|v| is_positive(v))
    }
}

/// One report column: which asset it measures and how it is titled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetColumn {
    pub asset: AssetRef,
    pub header: DisplayHeader,
}

/// Statistics of one network check. A check unit is one (account, asset) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckStats {
    pub total_accounts: usize,
    pub total_assets: usize,
    pub successful_checks: usize,
    pub failed_checks: usize,
    pub duration: Duration,
}

impl CheckStats {
    pub fn total_checks(&self) -> usize {
        self.successful_checks + self.failed_checks
    }
}

/// Result of checking one network.
#[derive(Debug, Clone)]
pub struct NetworkReport {
    pub network: NetworkConfig,
    /// `columns[i]` names the i-th requested asset
    pub columns: Vec<AssetColumn>,
    /// One record per input account, in input order
    pub results: Vec<BalanceRecord>,
    pub stats: CheckStats,
}

impl NetworkReport {
    pub fn display_headers(&self) -> impl Iterator<Item = &DisplayHeader> {
        self.columns.iter().map(|c| &c.header)
    }

    /// Column titled `header`, first match in column order.
    pub fn column_by_header(&self, header: &str) -> Option<&AssetColumn> {
        self.columns.iter().find(|c| c.header.as_str() == header)
    }

    pub fn accounts_with_balance(&self) -> usize {
        self.results.iter().filter(|r| r.has_balance()).count()
    }
}

/// Totals over every report of a run, logged when the run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub networks: usize,
    /// Distinct addresses holding a non-zero balance on any network
    pub accounts_with_balance: usize,
    pub total_checks: usize,
    pub failed_checks: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn from_reports(reports: &[NetworkReport]) -> Self {
        let funded: HashSet<Address> = reports
            .iter()
            .flat_map(|r| r.results.iter())
            .filter(|r| r.has_balance())
            .map(|r| r.account.address)
            .collect();

        Self {
            networks: reports.len(),
            accounts_with_balance: funded.len(),
            total_checks: reports.iter().map(|r| r.stats.total_checks()).sum(),
            failed_checks: reports.iter().map(|r| r.stats.failed_checks).sum(),
            duration: reports.iter().map(|r| r.stats.duration).sum(),
        }
    }
}

/// Tunables shared by every network check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Addresses per bundled read
    pub batch_size: usize,
    /// Attempts per batch; zero behaves like one
    pub retry_attempts: u32,
    /// Pause between attempts of the same batch
    pub retry_delay: Duration,
    /// Cap on concurrently running batches per asset; `None` runs all at once
    pub max_in_flight: Option<NonZeroUsize>,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            batch_size: 200,
            retry_attempts: 3,
            retry_delay: Duration::from_millis(1000),
            max_in_flight: None,
        }
    }
}

impl CheckerOptions {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts,
            delay: self.retry_delay,
        }
    }
}

/// Progress notification emitted while checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A network check moved to `state`.
    StateChanged {
        network: &'static str,
        state: CheckState,
    },
    /// A column header has been resolved.
    AssetResolved {
        network: &'static str,
        header: DisplayHeader,
        completed: usize,
        total: usize,
    },
    /// All batches of one asset have finished; counts are check units.
    AssetChecked {
        network: &'static str,
        header: DisplayHeader,
        completed: usize,
        total: usize,
    },
    /// A network of a multi-network run is done, checked or skipped.
    NetworkFinished {
        network: &'static str,
        completed: usize,
        total: usize,
    },
}

/// One-way receiver of [`Progress`] notifications.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, progress: Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn notify(&self, progress: Progress) {
        self(progress)
    }
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn notify(&self, _progress: Progress) {}
}

/// Writes progress to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn notify(&self, progress: Progress) {
        match progress {
            Progress::StateChanged { network, state } => {
                tracing::debug!(network, state = ?state, "Check state changed")
            }
            Progress::AssetResolved {
                network,
                header,
                completed,
                total,
            } => tracing::debug!(network, asset = %header, completed, total, "Asset resolved"),
            Progress::AssetChecked {
                network,
                header,
                completed,
                total,
            } => tracing::info!(network, asset = %header, completed, total, "Asset checked"),
            Progress::NetworkFinished {
                network,
                completed,
                total,
            } => tracing::info!(network, "Networks done ({completed}/{total})"),
        }
    }
}

pub(crate) fn is_positive(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok_and(|v| v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_debug_redacts_secret() {
        let account = Account::with_secret(Address::repeat_byte(1), "deadbeef");
        let printed = format!("{account:?}");
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("deadbeef"));

        let watch = format!("{:?}", Account::watch(Address::repeat_byte(1)));
        assert!(watch.contains("None"));
    }

    #[test]
    fn record_defaults_missing_assets_to_zero() {
        let mut record = BalanceRecord::new(Account::watch(Address::repeat_byte(2)));
        assert_eq!(record.balance(&AssetRef::Native), "0");
        assert!(!record.has_balance());

        record.balances.insert(AssetRef::Native, "0.25".to_string());
        assert_eq!(record.balance(&AssetRef::Native), "0.25");
        assert!(record.has_balance());
    }

    #[test]
    fn positive_values() {
        assert!(is_positive("1.5"));
        assert!(is_positive("0.000001"));
        assert!(!is_positive("0"));
        assert!(!is_positive("0.0"));
        assert!(!is_positive(""));
        assert!(!is_positive("abc"));
    }

    #[test]
    fn closures_are_progress_sinks() {
        let seen = std::sync::Mutex::new(Vec::new());
        let sink = |p: Progress| seen.lock().unwrap().push(p);
        sink.notify(Progress::NetworkFinished {
            network: "base",
            completed: 1,
            total: 2,
        });
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn default_options() {
        let options = CheckerOptions::default();
        assert_eq!(options.batch_size, 200);
        assert_eq!(options.retry_attempts, 3);
        assert_eq!(options.retry_delay, Duration::from_millis(1000));
        assert_eq!(options.max_in_flight, None);
    }
}
