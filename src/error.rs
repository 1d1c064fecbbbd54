// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::blockchain::ClientError;
use crate::config::ConfigError;
use crate::report::ReportError;

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read wallets from {path}: {source}")]
    Wallets {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No wallets found in {0}")]
    NoWallets(String),

    #[error("Network selection failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_layer_errors() {
        let err: CheckerError = ConfigError::UnknownNetwork("atlantis".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: Unknown network: atlantis");

        let err: CheckerError = ClientError::InvalidRpcUrl("x".to_string()).into();
        assert_eq!(err.to_string(), "Invalid RPC URL: x");

        assert_eq!(
            CheckerError::NoWallets("wallets.txt".to_string()).to_string(),
            "No wallets found in wallets.txt"
        );
    }
}
