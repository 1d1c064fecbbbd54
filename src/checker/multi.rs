// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sequential check of many networks.

use crate::blockchain::{CallBundler, ClientError, NetworkConfig};

use super::batch::with_retry;
use super::network::NetworkChecker;
use super::{Account, CheckerOptions, NetworkReport, NoProgress, Progress, ProgressSink};

/// Checks networks one after the other; a network that cannot be reached is
/// logged and left out of the result.
pub struct MultiNetworkChecker<'a, F> {
    networks: Vec<NetworkConfig>,
    accounts: &'a [Account],
    options: &'a CheckerOptions,
    connect: F,
    progress: &'a dyn ProgressSink,
}

impl<'a, F, B> MultiNetworkChecker<'a, F>
where
    F: Fn(&NetworkConfig) -> Result<B, ClientError>,
    B: CallBundler,
{
    /// `connect` builds the call transport for a network.
    pub fn new(
        networks: Vec<NetworkConfig>,
        accounts: &'a [Account],
        options: &'a CheckerOptions,
        connect: F,
    ) -> Self {
        Self {
            networks,
            accounts,
            options,
            connect,
            progress: &NoProgress,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Check every network in order and collect the reports of those that
    /// could be reached.
    pub async fn run(self) -> Vec<NetworkReport> {
        let total = self.networks.len();
        let mut reports = Vec::with_capacity(total);

        for (index, network) in self.networks.iter().enumerate() {
            match self.check_network(network).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::warn!(network = %network.name, error = %e, "Skipping network");
                }
            }

            self.progress.notify(Progress::NetworkFinished {
                network: network.id,
                completed: index + 1,
                total,
            });
        }

        tracing::info!(checked = reports.len(), total, "All networks done");
        reports
    }

    async fn check_network(&self, network: &NetworkConfig) -> Result<NetworkReport, ClientError> {
        let bundler = (self.connect)(network)?;

        let policy = self.options.retry_policy();
        let head = with_retry(&policy, "Chain head probe", || bundler.block_number()).await?;
        tracing::debug!(network = %network.name, block = head, "Connected");

        Ok(NetworkChecker::new(network.clone(), &bundler, self.accounts, self.options)
            .with_progress(self.progress)
            .run()
            .await)
    }
}
