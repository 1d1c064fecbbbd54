// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet list loading.
//!
//! One entry per non-empty line. A 42-character `0x` string is an address;
//! anything else is read as a hex private key and the address is derived
//! from it. Lines that are neither are skipped with a warning.

use std::path::Path;

use alloy::primitives::Address;

use crate::blockchain::parse_private_key;
use crate::checker::Account;

/// Read and parse the wallet list at `path`.
pub fn load_wallets(path: &Path) -> std::io::Result<Vec<Account>> {
    let contents = std::fs::read_to_string(path)?;
    let accounts = parse_wallets(&contents);
    tracing::info!(path = %path.display(), accounts = accounts.len(), "Loaded wallets");
    Ok(accounts)
}

/// Parse wallet list contents, skipping blank and invalid lines.
pub fn parse_wallets(contents: &str) -> Vec<Account> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let account = parse_line(line);
            if account.is_none() {
                // Never log the line itself, it may be a mistyped key
                tracing::warn!(line = index + 1, "Skipping unparsable wallet entry");
            }
            account
        })
        .collect()
}

fn parse_line(line: &str) -> Option<Account> {
    if line.len() == 42 && line.starts_with("0x") {
        return line.parse::<Address>().ok().map(Account::watch);
    }

    let signer = parse_private_key(line).ok()?;
    Some(Account::with_secret(signer.address(), line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Anvil's first default account
    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn parses_addresses_and_keys() {
        let contents = format!(
            "\n  0x70997970C51812dc3A010C7d01b50e0d17dc79C8  \n{KEY}\n\nnot a wallet\n0x1234\n"
        );

        let accounts = parse_wallets(&contents);

        assert_eq!(accounts.len(), 2);
        assert_eq!(
            accounts[0],
            Account::watch("0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap())
        );
        assert_eq!(accounts[1].address, KEY_ADDRESS.parse::<Address>().unwrap());
        assert_eq!(accounts[1].secret.as_deref(), Some(KEY));
    }

    #[test]
    fn lowercase_addresses_are_accepted() {
        let accounts = parse_wallets("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
        assert_eq!(accounts.len(), 1);
        assert!(accounts[0].secret.is_none());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{KEY_ADDRESS}").unwrap();

        let accounts = load_wallets(file.path()).unwrap();
        assert_eq!(accounts.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_wallets(&dir.path().join("missing.txt")).is_err());
    }
}
