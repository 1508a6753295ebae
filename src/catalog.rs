// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Built-in catalogue of assets and counterparty chains.

use sha2::{Digest, Sha256};

use crate::models::{AssetId, Chain, DenomUnit, Metadata};

/// Static asset configuration.
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub symbol: &'static str,
    pub base: &'static str,
    pub display: &'static str,
    /// `(denom, exponent)` pairs, base unit first.
    pub units: &'static [(&'static str, u8)],
}

/// Static counterparty chain configuration.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain_id: &'static str,
    pub display_name: &'static str,
    pub ibc_channel: Option<&'static str>,
    pub address_prefix: &'static str,
}

/// Native staking token.
pub const PENUMBRA: AssetConfig = AssetConfig {
    symbol: "UM",
    base: "upenumbra",
    display: "penumbra",
    units: &[("upenumbra", 0), ("mpenumbra", 3), ("penumbra", 6)],
};

pub const TEST_USD: AssetConfig = AssetConfig {
    symbol: "TestUSD",
    base: "wtest_usd",
    display: "test_usd",
    units: &[("wtest_usd", 0), ("test_usd", 18)],
};

/// Governance token, six decimals like UM.
pub const GM: AssetConfig = AssetConfig {
    symbol: "GM",
    base: "ugm",
    display: "gm",
    units: &[("ugm", 0), ("mgm", 3), ("gm", 6)],
};

pub const KNOWN_ASSETS: &[AssetConfig] = &[PENUMBRA, TEST_USD, GM];

pub const OSMOSIS_TESTNET: ChainConfig = ChainConfig {
    chain_id: "osmo-test-5",
    display_name: "Osmosis",
    ibc_channel: Some("channel-0"),
    address_prefix: "osmo",
};

pub const NOBLE_TESTNET: ChainConfig = ChainConfig {
    chain_id: "grand-1",
    display_name: "Noble",
    ibc_channel: Some("channel-3"),
    address_prefix: "noble",
};

/// Listed for display; no channel has been opened yet.
pub const COSMOS_HUB_TESTNET: ChainConfig = ChainConfig {
    chain_id: "theta-testnet-001",
    display_name: "Cosmos Hub",
    ibc_channel: None,
    address_prefix: "cosmos",
};

pub const KNOWN_CHAINS: &[ChainConfig] = &[OSMOSIS_TESTNET, NOBLE_TESTNET, COSMOS_HUB_TESTNET];

/// Asset id derived from the base denomination.
pub fn asset_id_for_denom(base: &str) -> AssetId {
    AssetId {
        inner: Sha256::digest(base.as_bytes()).to_vec(),
    }
}

impl AssetConfig {
    pub fn metadata(&self) -> Metadata {
        Metadata {
            base: self.base.to_string(),
            display: self.display.to_string(),
            symbol: self.symbol.to_string(),
            denom_units: self
                .units
                .iter()
                .map(|(denom, exponent)| DenomUnit {
                    denom: denom.to_string(),
                    exponent: *exponent,
                })
                .collect(),
            penumbra_asset_id: asset_id_for_denom(self.base),
        }
    }
}

impl ChainConfig {
    pub fn chain(&self) -> Chain {
        Chain {
            chain_id: self.chain_id.to_string(),
            display_name: self.display_name.to_string(),
            ibc_channel: self.ibc_channel.map(str::to_string),
            address_prefix: Some(self.address_prefix.to_string()),
        }
    }
}

pub fn known_assets() -> Vec<Metadata> {
    KNOWN_ASSETS.iter().map(AssetConfig::metadata).collect()
}

pub fn known_chains() -> Vec<Chain> {
    KNOWN_CHAINS.iter().map(ChainConfig::chain).collect()
}

/// Look up an asset by id.
pub fn find_asset(id: &AssetId) -> Option<Metadata> {
    KNOWN_ASSETS
        .iter()
        .map(AssetConfig::metadata)
        .find(|meta| &meta.penumbra_asset_id == id)
}

pub fn find_chain(chain_id: &str) -> Option<Chain> {
    KNOWN_CHAINS
        .iter()
        .find(|c| c.chain_id == chain_id)
        .map(ChainConfig::chain)
}
