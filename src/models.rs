// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wire-level domain types shared by the routers, the relay and the pipeline.
//!
//! These structs stand in for the chain's typed message contract. They are
//! serialised as camelCase JSON; byte fields travel as lowercase hex and
//! 128-bit amounts as decimal strings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Serde adapter for byte fields carried as lowercase hex strings.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T: AsRef<[u8]>, S: Serializer>(bytes: &T, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(d)?;
        hex::decode(raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Amounts & Assets
// =============================================================================

/// Amount in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub u128);

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse::<u128>()
            .map(Amount)
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId {
    #[serde(with = "hex_bytes")]
    pub inner: Vec<u8>,
}

/// One denomination of an asset and its scaling exponent relative to the base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomUnit {
    pub denom: String,
    pub exponent: u8,
}

/// Asset metadata, as listed by the view service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Base (smallest) denomination, e.g. `upenumbra`
    pub base: String,
    /// Denomination shown to users, e.g. `penumbra`
    pub display: String,
    pub symbol: String,
    pub denom_units: Vec<DenomUnit>,
    pub penumbra_asset_id: AssetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denom {
    pub denom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub amount: Amount,
    pub asset_id: AssetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(with = "hex_bytes")]
    pub inner: Vec<u8>,
}

// =============================================================================
// IBC
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Height {
    pub revision_number: u64,
    pub revision_height: u64,
}

/// Light-client state of a counterparty chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    pub chain_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_height: Option<Height>,
}

/// A client state as returned by the IBC client query. The inner state is
/// absent when the backend could not unpack it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiedClientState {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_state: Option<ClientState>,
}

/// A counterparty chain the wallet can withdraw to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub chain_id: String,
    pub display_name: String,
    /// Source channel on our side; `None` if no channel is open yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibc_channel: Option<String>,
    /// Bech32 human-readable prefix of addresses on this chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ics20Withdrawal {
    pub amount: Amount,
    pub denom: Denom,
    pub destination_chain_address: String,
    pub return_address: Address,
    pub timeout_height: Height,
    /// Unix time in milliseconds.
    pub timeout_time: u64,
    pub source_channel: String,
}

// =============================================================================
// Transaction artifacts
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPlannerRequest {
    #[serde(default)]
    pub ics20_withdrawals: Vec<Ics20Withdrawal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActionPlan {
    Spend { value: Value },
    Output { value: Value, dest_address: Address },
    Ics20Withdrawal(Ics20Withdrawal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPlan {
    pub actions: Vec<ActionPlan>,
    pub chain_id: String,
    pub expiry_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "hex_bytes")] pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationData {
    #[serde(with = "hex_bytes")]
    pub effect_hash: Vec<u8>,
    pub spend_auths: Vec<Signature>,
}

/// A fully built transaction, opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "hex_bytes")]
    pub bytes: Vec<u8>,
}

impl Transaction {
    /// Content-addressed identifier: SHA-256 of the encoded transaction.
    pub fn id(&self) -> TransactionId {
        TransactionId {
            hash: Sha256::digest(&self.bytes).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
}

impl TransactionId {
    pub fn from_hex(raw: &str) -> Result<Self, hex::FromHexError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        Ok(Self {
            hash: hex::decode(digits)?,
        })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.hash)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// =============================================================================
// Transaction history
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionView {
    Spend,
    Output,
    Swap,
    SwapClaim,
    Delegate,
    Undelegate,
    Ics20Withdrawal,
    Other,
}

/// The decrypted, viewer-relative view of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    pub actions: Vec<ActionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub height: u64,
    pub id: TransactionId,
    pub transaction: Transaction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<TransactionView>,
}

/// Short human-readable description of what a transaction did.
pub fn classify_transaction(view: Option<&TransactionView>) -> &'static str {
    let Some(view) = view else {
        return "Unknown";
    };
    let has = |kind: ActionView| view.actions.contains(&kind);

    if has(ActionView::Swap) {
        "Swap"
    } else if has(ActionView::SwapClaim) {
        "Swap Claim"
    } else if has(ActionView::Delegate) {
        "Delegate"
    } else if has(ActionView::Undelegate) {
        "Undelegate"
    } else if has(ActionView::Ics20Withdrawal) {
        "Ics20 Withdrawal"
    } else if has(ActionView::Spend) && has(ActionView::Output) {
        "Send"
    } else if has(ActionView::Output) {
        "Receive"
    } else {
        "Unknown"
    }
}
