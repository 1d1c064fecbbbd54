// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Report Export
//!
//! Writes check results as `;`-delimited files under the results directory:
//!
//! - `<network-id>.csv` for a single network
//! - `all_networks_balances.csv` for a merged multi-network run
//!
//! The directory is created on first export.

pub mod merge;
pub mod table;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::checker::NetworkReport;

pub use merge::merge_reports;
pub use table::{format_total, Table};

/// File name of the merged multi-network report.
pub const ALL_NETWORKS_FILE: &str = "all_networks_balances.csv";

/// Writes report tables to disk.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    results_dir: PathBuf,
}

impl ReportExporter {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// Write one network's report to `<results_dir>/<network-id>.csv`.
    pub fn export_single(&self, report: &NetworkReport) -> Result<PathBuf, ReportError> {
        let file_name = format!("{}.csv", report.network.id);
        self.write(&file_name, &Table::single(report))
    }

    /// Merge `reports` and write them to `<results_dir>/all_networks_balances.csv`.
    pub fn export_all(&self, reports: &[NetworkReport]) -> Result<PathBuf, ReportError> {
        self.write(ALL_NETWORKS_FILE, &merge_reports(reports))
    }

    fn write(&self, file_name: &str, table: &Table) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.results_dir).map_err(|e| ReportError::io(&self.results_dir, e))?;

        let path = self.results_dir.join(file_name);
        let file = File::create(&path).map_err(|e| ReportError::io(&path, e))?;
        let mut out = BufWriter::new(file);
        table
            .write_to(&mut out)
            .and_then(|()| out.flush())
            .map_err(|e| ReportError::io(&path, e))?;

        tracing::info!(path = %path.display(), rows = table.len(), "Report written");
        Ok(path)
    }
}

/// Errors that can occur while writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
