// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed requests and responses, one closed enum per service family.
//!
//! Each enum carries an `Unregistered` variant for methods the family does not
//! serve. Their payload is never decoded, so a caller using a newer protocol
//! revision cannot crash the router.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::discriminator::ServiceFamily;
use crate::models::{
    Address, AuthorizationData, IdentifiedClientState, Metadata, Transaction, TransactionId,
    TransactionInfo, TransactionPlan, TransactionPlannerRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid payload for {method}: {source}")]
    Payload {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a payload; an absent (`null`) payload reads as `{}`.
fn decode_payload<T: DeserializeOwned>(
    method: &str,
    payload: serde_json::Value,
) -> Result<T, DecodeError> {
    let payload = if payload.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        payload
    };
    serde_json::from_value(payload).map_err(|source| DecodeError::Payload {
        method: method.to_string(),
        source,
    })
}

// =============================================================================
// Std
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBlocksRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBlocksResponse {}

#[derive(Debug, Clone, PartialEq)]
pub enum StdRequest {
    SyncBlocks(SyncBlocksRequest),
    Unregistered { method: String },
}

impl StdRequest {
    pub const SYNC_BLOCKS: &'static str = "SyncBlocks";

    pub fn decode(method: &str, payload: serde_json::Value) -> Result<Self, DecodeError> {
        Ok(match method {
            Self::SYNC_BLOCKS => Self::SyncBlocks(decode_payload(method, payload)?),
            _ => Self::Unregistered {
                method: method.to_string(),
            },
        })
    }
}

// =============================================================================
// View
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionInfoByHashRequest {
    pub id: Option<TransactionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionInfoByHashResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_info: Option<TransactionInfo>,
}

/// Inclusive height bounds; absent bounds are open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionInfoRequest {
    pub start_height: Option<u64>,
    pub end_height: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionInfoResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_info: Option<TransactionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denom_metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EphemeralAddressRequest {
    pub address_index: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemeralAddressResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionPlannerResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<TransactionPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WitnessAndBuildRequest {
    pub transaction_plan: Option<TransactionPlan>,
    pub authorization_data: Option<AuthorizationData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WitnessAndBuildResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BroadcastTransactionRequest {
    pub transaction: Option<Transaction>,
    /// Wait until the wallet has seen the transaction on chain.
    pub await_detection: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastTransactionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TransactionId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewRequest {
    TransactionInfoByHash(TransactionInfoByHashRequest),
    TransactionInfo(TransactionInfoRequest),
    Assets(AssetsRequest),
    EphemeralAddress(EphemeralAddressRequest),
    TransactionPlanner(TransactionPlannerRequest),
    WitnessAndBuild(WitnessAndBuildRequest),
    BroadcastTransaction(BroadcastTransactionRequest),
    Unregistered { method: String },
}

impl ViewRequest {
    pub const TRANSACTION_INFO_BY_HASH: &'static str = "TransactionInfoByHash";
    pub const TRANSACTION_INFO: &'static str = "TransactionInfo";
    pub const ASSETS: &'static str = "Assets";
    pub const EPHEMERAL_ADDRESS: &'static str = "EphemeralAddress";
    pub const TRANSACTION_PLANNER: &'static str = "TransactionPlanner";
    pub const WITNESS_AND_BUILD: &'static str = "WitnessAndBuild";
    pub const BROADCAST_TRANSACTION: &'static str = "BroadcastTransaction";

    pub fn decode(method: &str, payload: serde_json::Value) -> Result<Self, DecodeError> {
        Ok(match method {
            Self::TRANSACTION_INFO_BY_HASH => {
                Self::TransactionInfoByHash(decode_payload(method, payload)?)
            }
            Self::TRANSACTION_INFO => Self::TransactionInfo(decode_payload(method, payload)?),
            Self::ASSETS => Self::Assets(decode_payload(method, payload)?),
            Self::EPHEMERAL_ADDRESS => Self::EphemeralAddress(decode_payload(method, payload)?),
            Self::TRANSACTION_PLANNER => Self::TransactionPlanner(decode_payload(method, payload)?),
            Self::WITNESS_AND_BUILD => Self::WitnessAndBuild(decode_payload(method, payload)?),
            Self::BROADCAST_TRANSACTION => {
                Self::BroadcastTransaction(decode_payload(method, payload)?)
            }
            _ => Self::Unregistered {
                method: method.to_string(),
            },
        })
    }
}

// =============================================================================
// Custody
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizeRequest {
    pub plan: Option<TransactionPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AuthorizationData>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustodyRequest {
    Authorize(AuthorizeRequest),
    Unregistered { method: String },
}

impl CustodyRequest {
    pub const AUTHORIZE: &'static str = "Authorize";

    pub fn decode(method: &str, payload: serde_json::Value) -> Result<Self, DecodeError> {
        Ok(match method {
            Self::AUTHORIZE => Self::Authorize(decode_payload(method, payload)?),
            _ => Self::Unregistered {
                method: method.to_string(),
            },
        })
    }
}

// =============================================================================
// IBC client
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStatesRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryClientStatesResponse {
    pub client_states: Vec<IdentifiedClientState>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IbcClientRequest {
    ClientStates(QueryClientStatesRequest),
    Unregistered { method: String },
}

impl IbcClientRequest {
    pub const CLIENT_STATES: &'static str = "ClientStates";

    pub fn decode(method: &str, payload: serde_json::Value) -> Result<Self, DecodeError> {
        Ok(match method {
            Self::CLIENT_STATES => Self::ClientStates(decode_payload(method, payload)?),
            _ => Self::Unregistered {
                method: method.to_string(),
            },
        })
    }
}

// =============================================================================
// Any family
// =============================================================================

/// A decoded request of any family.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletRequest {
    Std(StdRequest),
    View(ViewRequest),
    Custody(CustodyRequest),
    IbcClient(IbcClientRequest),
}

impl WalletRequest {
    pub fn decode(
        family: ServiceFamily,
        method: &str,
        payload: serde_json::Value,
    ) -> Result<Self, DecodeError> {
        Ok(match family {
            ServiceFamily::Std => Self::Std(StdRequest::decode(method, payload)?),
            ServiceFamily::View => Self::View(ViewRequest::decode(method, payload)?),
            ServiceFamily::Custody => Self::Custody(CustodyRequest::decode(method, payload)?),
            ServiceFamily::IbcClient => Self::IbcClient(IbcClientRequest::decode(method, payload)?),
        })
    }
}
