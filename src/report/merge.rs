// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Merge of many network reports into one table.
//!
//! Every (network, header) pair becomes a column titled
//! `"<header> (<network name>)"`. Columns of networks sharing the most common
//! native currency come first, then networks by name, then the native column
//! of each network ahead of its tokens.
//!
//! A cell holds the first positive value found when scanning the reports in
//! order, not a sum, so merging a report with itself changes nothing.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use alloy::primitives::Address;

use crate::blockchain::AssetRef;
use crate::checker::{is_positive, Account, BalanceRecord, NetworkReport, ZERO_BALANCE};

use super::table::Table;

struct MergedColumn<'r> {
    report: &'r NetworkReport,
    header: &'r str,
    title: String,
}

impl MergedColumn<'_> {
    fn is_native(&self) -> bool {
        self.report.network.is_native_header(self.header)
    }
}

/// Build the merged table of `reports`.
pub fn merge_reports(reports: &[NetworkReport]) -> Table {
    let accounts = unique_accounts(reports);
    let columns = merged_columns(reports);

    let with_secrets = accounts.iter().any(|a| a.secret.is_some());
    let mut table = Table::new(columns.iter().map(|c| c.title.clone()).collect(), with_secrets);

    let index: Vec<HashMap<Address, &BalanceRecord>> =
        reports.iter().map(records_by_address).collect();
    let suffixes: Vec<String> = reports.iter().map(|r| format!(" ({})", r.network.name)).collect();

    for account in accounts {
        let values = columns
            .iter()
            .map(|column| {
                first_positive(reports, &index, &suffixes, &column.title, account.address)
                    .unwrap_or(ZERO_BALANCE)
                    .to_string()
            })
            .collect();
        table.push_row(account, values);
    }

    table
}

/// Accounts in first-seen order; the first secret seen for an address wins.
fn unique_accounts(reports: &[NetworkReport]) -> Vec<&Account> {
    let mut seen = HashSet::new();
    reports
        .iter()
        .flat_map(|r| r.results.iter())
        .map(|r| &r.account)
        .filter(|a| seen.insert(a.address))
        .collect()
}

fn merged_columns(reports: &[NetworkReport]) -> Vec<MergedColumn<'_>> {
    let mut seen = HashSet::new();
    let mut columns: Vec<MergedColumn<'_>> = reports
        .iter()
        .flat_map(|report| {
            report.display_headers().map(move |header| MergedColumn {
                report,
                header: header.as_str(),
                title: format!("{header} ({})", report.network.name),
            })
        })
        .filter(|c| seen.insert((c.report.network.id, c.header)))
        .collect();

    let baseline = baseline_currency(reports);
    columns.sort_by(|a, b| compare_columns(a, b, baseline));
    columns
}

/// Most common native currency; ties go to the one seen first.
fn baseline_currency(reports: &[NetworkReport]) -> Option<&'static str> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for report in reports {
        let currency = report.network.native_currency;
        match counts.iter_mut().find(|(c, _)| *c == currency) {
            Some((_, n)) => *n += 1,
            None => counts.push((currency, 1)),
        }
    }

    counts
        .into_iter()
        .fold(None, |best: Option<(&'static str, usize)>, (currency, n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((currency, n)),
        })
        .map(|(currency, _)| currency)
}

fn compare_columns(a: &MergedColumn<'_>, b: &MergedColumn<'_>, baseline: Option<&str>) -> Ordering {
    let in_baseline = |c: &MergedColumn<'_>| Some(c.report.network.native_currency) == baseline;

    in_baseline(b)
        .cmp(&in_baseline(a))
        .then_with(|| compare_text(a.report.network.name, b.report.network.name))
        .then_with(|| b.is_native().cmp(&a.is_native()))
        .then_with(|| compare_text(a.header, b.header))
}

/// Case-insensitive, falling back to a plain comparison for a stable order.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn records_by_address(report: &NetworkReport) -> HashMap<Address, &BalanceRecord> {
    let mut records = HashMap::new();
    for record in &report.results {
        records.entry(record.account.address).or_insert(record);
    }
    records
}

/// Scan reports in order for the first positive value behind `title`.
fn first_positive<'r>(
    reports: &'r [NetworkReport],
    index: &[HashMap<Address, &'r BalanceRecord>],
    suffixes: &[String],
    title: &str,
    address: Address,
) -> Option<&'r str> {
    reports
        .iter()
        .zip(index)
        .zip(suffixes)
        .filter_map(|((report, records), suffix)| {
            let record = records.get(&address).copied()?;
            let header = title.strip_suffix(suffix.as_str()).unwrap_or(title);
            lookup(report, record, header)
        })
        .find(|value| is_positive(value))
}

/// Value of the per-network `header` in `record`: native column, then the
/// known token table, then the report's own columns.
fn lookup<'r>(report: &NetworkReport, record: &'r BalanceRecord, header: &str) -> Option<&'r str> {
    let network = &report.network;
    let asset = if network.is_native_header(header) {
        AssetRef::Native
    } else if let Some(token) = network.token_by_name(header) {
        AssetRef::Token(token.address)
    } else {
        report.column_by_header(header)?.asset
    };

    record.balances.get(&asset).map(String::as_str)
}
