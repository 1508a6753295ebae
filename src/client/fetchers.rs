// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Convenience reads for wallet pages.

use serde::Serialize;

use super::RelayWalletClient;
use crate::models::{classify_transaction, Metadata, TransactionId, TransactionInfo};
use crate::protocol::{AssetsRequest, TransactionInfoByHashRequest, TransactionInfoRequest};
use crate::relay::ClientError;

/// One row of the transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionSummary {
    pub height: u64,
    /// Hex transaction hash, or `"unknown"`
    pub hash: String,
    pub description: &'static str,
}

impl TransactionSummary {
    fn from_info(info: Option<&TransactionInfo>) -> Self {
        Self {
            height: info.map_or(0, |info| info.height),
            hash: info.map_or_else(|| "unknown".to_string(), |info| info.id.to_hex()),
            description: classify_transaction(info.and_then(|info| info.view.as_ref())),
        }
    }
}

/// Full history, newest first.
pub async fn get_all_transactions(
    client: &RelayWalletClient,
) -> Result<Vec<TransactionSummary>, ClientError> {
    let responses = client
        .transaction_info(TransactionInfoRequest::default())
        .await?
        .collect()
        .await?;

    let mut summaries: Vec<_> = responses
        .iter()
        .map(|response| TransactionSummary::from_info(response.tx_info.as_ref()))
        .collect();
    summaries.sort_by(|a, b| b.height.cmp(&a.height));
    Ok(summaries)
}

/// Every asset the wallet knows about.
pub async fn get_all_assets(client: &RelayWalletClient) -> Result<Vec<Metadata>, ClientError> {
    let responses = client.assets(AssetsRequest::default()).await?.collect().await?;
    Ok(responses
        .into_iter()
        .filter_map(|response| response.denom_metadata)
        .collect())
}

/// Look up one transaction by its hex hash (`0x` prefix optional).
pub async fn get_tx_info_by_hash(
    client: &RelayWalletClient,
    hash: &str,
) -> Result<Option<TransactionInfo>, ClientError> {
    let id = TransactionId::from_hex(hash)
        .map_err(|e| ClientError::InvalidArgument(format!("transaction hash {hash:?}: {e}")))?;
    let response = client
        .transaction_info_by_hash(TransactionInfoByHashRequest { id: Some(id) })
        .await?;
    Ok(response.tx_info)
}
