// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Built-in network registry.
//!
//! Each entry lists the tokens checked by default. A token without known
//! decimals is formatted with 18 decimals.

use std::borrow::Cow;

use alloy::primitives::address;

use super::types::{KnownToken, NetworkConfig};

/// Networks skipped by the all-networks run unless overridden.
pub const DEFAULT_EXCLUDED_NETWORKS: &[&str] = &["base-goerli", "xterio"];

const fn token(
    name: &'static str,
    address: alloy::primitives::Address,
    decimals: Option<u8>,
) -> KnownToken {
    KnownToken {
        name,
        address,
        decimals,
    }
}

const fn network(
    id: &'static str,
    name: &'static str,
    native_currency: &'static str,
    rpc_url: &'static str,
    tokens: &'static [KnownToken],
) -> NetworkConfig {
    NetworkConfig {
        id,
        name,
        native_currency,
        rpc_url: Cow::Borrowed(rpc_url),
        multicall_address: None,
        tokens,
    }
}

impl NetworkConfig {
    const fn with_multicall(mut self, multicall: alloy::primitives::Address) -> Self {
        self.multicall_address = Some(multicall);
        self
    }
}

/// Every network known to the checker, keyed by `id`.
pub static NETWORKS: &[NetworkConfig] = &[
    network("abstract", "Abstract", "ETH", "https://api.mainnet.abs.xyz", &[]),
    network("apechain", "ApeChain", "APE", "https://rpc.apechain.com", &[]),
    network(
        "arbitrum",
        "Arbitrum",
        "ETH",
        "https://arbitrum-one.public.blastapi.io",
        &[
            token("USDC", address!("0xff970a61a04b1ca14834a43f5de4533ebddb5cc8"), Some(6)),
            token("USDT", address!("0xfd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9"), Some(6)),
            token("WETH", address!("0x82af49447d8a07e3bd95bd0d56f35241523fbab1"), Some(18)),
        ],
    ),
    network(
        "arbitrum-nova",
        "Arbitrum Nova",
        "ETH",
        "https://arbitrum-nova.public.blastapi.io",
        &[
            token("USDC", address!("0x750ba8b76187092b0d1e87e28daaf484d1b5273b"), Some(6)),
            token("DAI", address!("0xda10009cbd5d07dd0cecc66161fc93d7c9000da1"), Some(18)),
            token("ARB", address!("0xf823c3cd3cebe0a1fa952ba88dc9eef8e0bf46ad"), Some(18)),
        ],
    ),
    network(
        "avalanche",
        "Avalanche",
        "AVAX",
        "https://ava-mainnet.public.blastapi.io/ext/bc/C/rpc",
        &[token("NFT", address!("0xd38a5dd253e9819722f6a22d09dfe994b79fec9f"), None)],
    ),
    network(
        "base",
        "Base",
        "ETH",
        "https://base-mainnet.public.blastapi.io",
        &[
            token("WETH", address!("0x4200000000000000000000000000000000000006"), Some(18)),
            token("IBGT", address!("0x2c3f2ce253e04cc01b1c91d23c1161f6e8674059"), None),
        ],
    ),
    network(
        "base-goerli",
        "Base Goerli",
        "ETH",
        "https://base-goerli.public.blastapi.io",
        &[
            token("USDC", address!("0xf175520c52418dfe19c8098071a252da48cd1c19"), Some(6)),
            token("BASEBUILDER", address!("0xac6564f3718837caadd42eed742d75c12b90a052"), None),
        ],
    ),
    network(
        "base-sepolia",
        "Base Sepolia",
        "ETH",
        "https://sepolia.base.org",
        &[
            token("USDC", address!("0x036cbd53842c5426634e7929541ec2318f3dcf7e"), Some(6)),
            token("WETH", address!("0x4200000000000000000000000000000000000006"), Some(18)),
        ],
    ),
    network(
        "berachain",
        "Berachain",
        "BERA",
        "https://berachain-rpc.publicnode.com",
        &[
            token("IBGT", address!("0xac03caba51e17c86c921e1f6cbfbdc91f8bb2e6b"), None),
            token("WBERA", address!("0x6969696969696969696969696969696969696969"), Some(18)),
            token("HONEY", address!("0xfcbd14dc51f0a4d49d5e53c2e0950e0bc26d0dce"), Some(18)),
        ],
    ),
    network(
        "blast",
        "Blast",
        "ETH",
        "https://blastl2-mainnet.public.blastapi.io",
        &[
            token("USDB", address!("0x4300000000000000000000000000000000000003"), Some(18)),
            token("WETH", address!("0x4300000000000000000000000000000000000004"), Some(18)),
            token("BLAST", address!("0xb1a5700fa2358173fe465e6ea4ff52e36e88e2ad"), Some(18)),
        ],
    ),
    network(
        "bnb",
        "BNB Chain",
        "BNB",
        "https://bsc-mainnet.public.blastapi.io",
        &[
            token("USDT", address!("0x55d398326f99059ff775485246999027b3197955"), Some(18)),
            token("USDC", address!("0x8ac76a51cc950d9822d68b83fe1ad97b32cd580d"), Some(18)),
            token("WBNB", address!("0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c"), Some(18)),
            token("EURA", address!("0x12f31b73d812c6bb0d735a218c086d44d5fe5f89"), Some(18)),
        ],
    ),
    network(
        "celo",
        "Celo",
        "CELO",
        "https://celo.drpc.org",
        &[
            token("EURA", address!("0xc16b81af351ba9e64c1a069e3ab18c244a1e3049"), Some(18)),
            token("agEURA", address!("0xf1ddcaca7d17f8030ab2eb54f2d9811365efe123"), Some(18)),
        ],
    ),
    network("ethereum", "Ethereum", "ETH", "https://eth.drpc.org", &[]),
    network(
        "ethereum-sepolia",
        "Ethereum Sepolia",
        "ETH",
        "https://ethereum-sepolia.publicnode.com",
        &[token("USDC", address!("0x1c7d4b196cb0c7b01d743fbc6116a902379c7238"), Some(6))],
    ),
    network(
        "fantom",
        "Fantom",
        "FTM",
        "https://fantom-mainnet.public.blastapi.io",
        &[
            token("USDC", address!("0x04068da6c83afcfa0e13ba15a6696662335d5b75"), Some(6)),
            token("USDT", address!("0x049d68029688eabf473097a2fc38ef61633a3c7a"), Some(6)),
            token("DAI", address!("0x8d11ec38a3eb5e956b052f67da8bdc9bef8abf3e"), Some(18)),
            token("WFTM", address!("0x21be370d5312f44cb42ce377bc9b8a0cef1a4c83"), Some(18)),
        ],
    ),
    network(
        "gnosis",
        "Gnosis",
        "xDAI",
        "https://gnosis-mainnet.public.blastapi.io",
        &[token("EURA", address!("0x4b1e2c2762667331bc91648052f646d1b0d35984"), Some(18))],
    ),
    network("harmony", "Harmony", "ONE", "https://1rpc.io/one", &[]),
    network(
        "linea",
        "Linea",
        "ETH",
        "https://linea-mainnet.public.blastapi.io",
        &[
            token("USDC", address!("0x176211869ca2b568f2a7d4ee941e073a821ee1ff"), Some(6)),
            token("USDT", address!("0xa219439258ca9da29e9cc4ce5596924745e12b93"), Some(6)),
            token("LXP", address!("0xd83af4fbd77f3ab65c3b1dc4b38d7e67aecf599a"), Some(18)),
            token("WETH", address!("0xe5d7c2a44ffddf6b295a15c148167daaaf5cf34f"), Some(18)),
            token("WBTC", address!("0x3aab2285ddcddad8edf438c1bab47e1a9d05a9b4"), Some(8)),
        ],
    ),
    network("megaeth", "MegaETH", "ETH", "https://carrot.megaeth.com/rpc", &[]),
    network(
        "monad-testnet",
        "Monad Testnet",
        "MON",
        "https://testnet-rpc.monad.xyz",
        &[
            token("CHOG", address!("0xe0590015a873bf326bd645c3e1266d4db41c4e6b"), None),
            token("YAKI", address!("0xfe140e1dce99be9f4f15d657cd9b7bf622270c50"), None),
            token("DAK", address!("0x0f0bdebf0f83cd1ee3974779bcb7315f9808c714"), None),
            token("WETH", address!("0x836047a99e11f376522b447bffb6e3495dd0637c"), None),
        ],
    ),
    network("optimism", "Optimism", "ETH", "https://optimism-mainnet.public.blastapi.io", &[]),
    network(
        "polygon",
        "Polygon",
        "MATIC",
        "https://polygon-mainnet.public.blastapi.io",
        &[
            token("USDC", address!("0x2791bca1f2de4661ed88a30c99a7a9449aa84174"), Some(6)),
            token("USDT", address!("0xc2132d05d31c914a87c6611c10748aeb04b58e8f"), Some(6)),
            token("EURA", address!("0xe0b52e49357fd4daf2c15e02058dce6bc0057db4"), Some(18)),
            token("LZagEUR", address!("0x0c1ebbb61374da1a8c57cb6681bf27178360d36f"), Some(18)),
        ],
    ),
    network(
        "polygon-zkevm",
        "Polygon zkEVM",
        "ETH",
        "https://polygon-zkevm-mainnet.public.blastapi.io",
        &[],
    ),
    network(
        "ronin",
        "Ronin",
        "RON",
        "https://api.roninchain.com/rpc",
        &[
            token("WRON", address!("0xe514d9deb7966c8be0ca922de8a064264ea6bcd4"), Some(18)),
            token("AXS", address!("0x97a9107c1793bc407d6f527b77e7fff4d812bece"), Some(18)),
            token("SLP", address!("0xa8754b9fa15fc18bb59458815510e40a12cd2014"), Some(0)),
        ],
    ),
    network(
        "scroll",
        "Scroll",
        "ETH",
        "https://scroll-mainnet.public.blastapi.io",
        &[
            token("USDC", address!("0x06efdbff2a14a7c8e15944d1f4a48f9f95f663a4"), Some(6)),
            token("USDT", address!("0xf55bec9cafdbe8730f096aa55dad6d22d44099df"), Some(6)),
            token("DAI", address!("0xca77eb3fefe3725dc33bccb54edefc3d9f764f97"), Some(18)),
            token("WETH", address!("0x5300000000000000000000000000000000000004"), Some(18)),
        ],
    ),
    network("shape", "Shape", "ETH", "https://mainnet.shape.network", &[]),
    network(
        "soneium",
        "Soneium",
        "ETH",
        "https://rpc.soneium.org",
        &[token("WETH", address!("0x4200000000000000000000000000000000000006"), Some(18))],
    ),
    network(
        "unichain",
        "Unichain",
        "ETH",
        "https://unichain-rpc.publicnode.com",
        &[token("UNI", address!("0x1f9840a85d5af5bf1d1762f925bdaddc4201f984"), Some(18))],
    ),
    network("xterio", "Xterio", "BNB", "https://xterio.alt.technology", &[]),
    network(
        "zero",
        "Zero",
        "ETH",
        "https://rpc.zerion.io/v1/zero",
        &[
            token("CLNY", address!("0x1a90dd3dd89e2d2095ed1b40ecc1fe2bbb7614a1"), None),
            token("NFT_DNA", address!("0xde0295449f96330d536dfed2477a13b7974876c5"), None),
            token("NFT_CLNY_AVATAR", address!("0xa3468e60d28402a51f1ff54ede10f7cda56d1a72"), None),
        ],
    ),
    network(
        "zksync",
        "zkSync",
        "ETH",
        "https://zksync-mainnet.public.blastapi.io",
        &[
            token("USDC", address!("0x3355df6d4c9c3035724fd0e3914de96a5a83aaf4"), Some(6)),
            token("USDT", address!("0x493257fd37edb34451f62edf8d2a0c418852ba4c"), Some(6)),
            token("DAI", address!("0x4b9eb6c0b6ea15176bbf62841c6b2a8a398cb656"), Some(18)),
            token("WETH", address!("0xf00dad97284d0c6f06dc4db3c32454d4292c6813"), Some(18)),
            token("WBTC", address!("0xbbeb516fb02a01611cbbe0453fe3c580d7281011"), Some(8)),
        ],
    )
    .with_multicall(address!("0x47898B2C52C957663aE9AB46922dCec150a2272c")),
    network(
        "zora",
        "Zora",
        "ETH",
        "https://rpc.zerion.io/v1/zora",
        &[
            token("WETH", address!("0x4200000000000000000000000000000000000006"), Some(18)),
            token("EHJOY", address!("0xa6b280b42cb0b7c4a4f789ec6ccc3a7609a1bc39"), None),
            token("IMAGINE", address!("0x078540eecc8b6d89949c9c7d5e8e91eab64f6696"), None),
        ],
    ),
];

/// Look up a network by id.
pub fn find_network(id: &str) -> Option<&'static NetworkConfig> {
    NETWORKS.iter().find(|n| n.id.eq_ignore_ascii_case(id.trim()))
}

/// Networks for the all-networks run, minus `excluded`, sorted by display name.
pub fn networks_for_all_run(excluded: &[String]) -> Vec<NetworkConfig> {
    let mut networks: Vec<NetworkConfig> = NETWORKS
        .iter()
        .filter(|n| !excluded.iter().any(|e| e.eq_ignore_ascii_case(n.id)))
        .cloned()
        .collect();
    networks.sort_by_key(|n| n.name.to_lowercase());
    networks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = NETWORKS.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), NETWORKS.len());
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find_network("Base").map(|n| n.name), Some("Base"));
        assert_eq!(find_network(" polygon ").map(|n| n.native_currency), Some("MATIC"));
        assert!(find_network("all").is_none());
    }

    #[test]
    fn zksync_uses_its_own_multicall() {
        let zksync = find_network("zksync").unwrap();
        assert_ne!(zksync.multicall(), crate::blockchain::MULTICALL3_ADDRESS);
        assert_eq!(
            find_network("base").unwrap().multicall(),
            crate::blockchain::MULTICALL3_ADDRESS
        );
    }

    #[test]
    fn all_run_excludes_and_sorts_by_display_name() {
        let excluded: Vec<String> =
            DEFAULT_EXCLUDED_NETWORKS.iter().map(|s| s.to_string()).collect();
        let networks = networks_for_all_run(&excluded);

        assert!(networks.iter().all(|n| n.id != "xterio" && n.id != "base-goerli"));
        assert_eq!(networks.len(), NETWORKS.len() - 2);

        let names: Vec<String> = networks.iter().map(|n| n.name.to_lowercase()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        // zkSync sorts among the z's, not before "Abstract"
        assert_eq!(networks.first().map(|n| n.id), Some("abstract"));
    }
}
