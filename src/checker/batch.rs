// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Batched reads with bounded retries.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::time::Duration;

use alloy::primitives::Address;
use futures::stream::{self, StreamExt};

use crate::blockchain::ClientError;

use super::provider::BatchBalanceSource;
use super::CheckerOptions;

/// How often, and how patiently, a failing operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts; zero behaves like one
    pub attempts: u32,
    /// Pause between two attempts
    pub delay: Duration,
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// Sleeps `policy.delay` between attempts, never after the last one. The
/// error of the final attempt is returned.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %e, "{what} failed, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// A batch whose attempts were all used up.
#[derive(Debug, Clone)]
pub struct FailedBatch {
    pub addresses: Vec<Address>,
    pub error: ClientError,
}

/// Merged result of every batch of one asset.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Balances of addresses in successful batches
    pub balances: HashMap<Address, String>,
    pub failed: Vec<FailedBatch>,
}

impl BatchOutcome {
    /// The error of the batch `address` belonged to, if that batch failed.
    pub fn error_for(&self, address: &Address) -> Option<&ClientError> {
        self.failed
            .iter()
            .find(|batch| batch.addresses.contains(address))
            .map(|batch| &batch.error)
    }

    pub fn failed_addresses(&self) -> usize {
        self.failed.iter().map(|b| b.addresses.len()).sum()
    }
}

/// Splits address lists into batches and reads them concurrently.
#[derive(Debug, Clone)]
pub struct BatchRetryExecutor {
    batch_size: usize,
    retry: RetryPolicy,
    max_in_flight: Option<NonZeroUsize>,
}

impl BatchRetryExecutor {
    pub fn new(options: &CheckerOptions) -> Self {
        Self {
            batch_size: options.batch_size.max(1),
            retry: options.retry_policy(),
            max_in_flight: options.max_in_flight,
        }
    }

    /// Read balances for all `addresses` from `source`.
    ///
    /// A list no longer than the batch size is one batch; longer lists are
    /// split into contiguous chunks. A batch that keeps failing is reported in
    /// [`BatchOutcome::failed`] without affecting the others.
    pub async fn execute<S: BatchBalanceSource>(
        &self,
        source: &S,
        addresses: &[Address],
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        if addresses.is_empty() {
            return outcome;
        }

        let batches: Vec<&[Address]> = addresses.chunks(self.batch_size).collect();
        let limit = self.max_in_flight.map_or(batches.len(), NonZeroUsize::get);

        let mut reads = stream::iter(batches)
            .map(|batch| async move {
                let result = with_retry(&self.retry, "Batch balance read", || {
                    source.get_batch_balances(batch)
                })
                .await;
                (batch, result)
            })
            .buffer_unordered(limit);

        while let Some((batch, result)) = reads.next().await {
            match result {
                Ok(balances) => outcome.balances.extend(balances),
                Err(error) => {
                    tracing::warn!(
                        addresses = batch.len(),
                        error = %error,
                        "Batch failed after all attempts"
                    );
                    outcome.failed.push(FailedBatch {
                        addresses: batch.to_vec(),
                        error,
                    });
                }
            }
        }

        outcome
    }
}
