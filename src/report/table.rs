// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `;`-delimited balance table with a totals row.

use std::io::{self, Write};

use crate::checker::{Account, NetworkReport};

pub const DELIMITER: &str = ";";

/// Label in the first cell of the totals row.
pub const TOTAL_LABEL: &str = "Total balance:";

/// One table: account columns, then one column per asset header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    with_secrets: bool,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Empty table. `with_secrets` adds a `PrivateKey` column.
    pub fn new(headers: Vec<String>, with_secrets: bool) -> Self {
        Self {
            with_secrets,
            headers,
            rows: Vec::new(),
        }
    }

    /// Table of one network, columns in resolution order.
    pub fn single(report: &NetworkReport) -> Self {
        let with_secrets = report.results.iter().any(|r| r.account.secret.is_some());
        let headers = report
            .display_headers()
            .map(|h| h.as_str().to_string())
            .collect();

        let mut table = Self::new(headers, with_secrets);
        for record in &report.results {
            let values = report
                .columns
                .iter()
                .map(|column| record.balance(&column.asset).to_string())
                .collect();
            table.push_row(&record.account, values);
        }
        table
    }

    /// Append a row; `values` follow the asset headers.
    pub fn push_row(&mut self, account: &Account, values: Vec<String>) {
        let mut row = Vec::with_capacity(self.account_columns() + values.len());
        row.push(account.address.to_string());
        if self.with_secrets {
            row.push(account.secret.clone().unwrap_or_default());
        }
        row.extend(values);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Full header row, account columns included.
    pub fn header_row(&self) -> Vec<String> {
        let mut header = vec!["Address".to_string()];
        if self.with_secrets {
            header.push("PrivateKey".to_string());
        }
        header.extend(self.headers.iter().cloned());
        header
    }

    /// Totals row, or `None` when there are no data rows.
    ///
    /// Each asset column is the sum of its numeric cells; cells that do not
    /// parse count as zero.
    pub fn totals_row(&self) -> Option<Vec<String>> {
        if self.rows.is_empty() {
            return None;
        }

        let offset = self.account_columns();
        let mut totals = vec![TOTAL_LABEL.to_string()];
        if self.with_secrets {
            totals.push(String::new());
        }
        totals.extend((0..self.headers.len()).map(|column| {
            let sum: f64 = self
                .rows
                .iter()
                .filter_map(|row| row.get(offset + column))
                .map(|cell| cell.trim().parse::<f64>().unwrap_or(0.0))
                .sum();
            format_total(sum)
        }));
        Some(totals)
    }

    /// Write header, rows, then a blank line and the totals row.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.header_row().join(DELIMITER))?;
        for row in &self.rows {
            writeln!(out, "{}", row.join(DELIMITER))?;
        }
        if let Some(totals) = self.totals_row() {
            writeln!(out)?;
            writeln!(out, "{}", totals.join(DELIMITER))?;
        }
        Ok(())
    }

    fn account_columns(&self) -> usize {
        if self.with_secrets {
            2
        } else {
            1
        }
    }
}

/// Six decimals, trailing zeros and a trailing dot removed.
pub fn format_total(sum: f64) -> String {
    let fixed = format!("{sum:.6}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
