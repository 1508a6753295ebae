// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! View service: history, assets, planning, proving and submission.
//!
//! Every handler reads its collaborators afresh, so results reflect the store
//! as of the request and not as of router construction.

use futures::future::FutureExt;
use tracing::{debug, info};

use super::{HandlerFuture, Reply, ServiceRouter};
use crate::auth::SenderIdentity;
use crate::error::ServiceError;
use crate::models::TransactionPlannerRequest;
use crate::protocol::{
    AssetsResponse, BroadcastTransactionRequest, BroadcastTransactionResponse,
    EphemeralAddressRequest, EphemeralAddressResponse, TransactionInfoByHashRequest,
    TransactionInfoByHashResponse, TransactionInfoRequest, TransactionInfoResponse,
    TransactionPlannerResponse, ViewRequest, WitnessAndBuildRequest, WitnessAndBuildResponse,
};
use crate::state::ServicesHandle;

pub struct ViewRouter {
    services: ServicesHandle,
}

impl ViewRouter {
    pub fn new(services: ServicesHandle) -> Self {
        Self { services }
    }
}

impl ServiceRouter for ViewRouter {
    type Request = ViewRequest;

    fn dispatch(&self, request: ViewRequest, _sender: &SenderIdentity) -> Option<HandlerFuture> {
        let services = self.services.clone();
        let reply = match request {
            ViewRequest::TransactionInfoByHash(request) => async move {
                Reply::unary(&transaction_info_by_hash(&services, request).await?)
            }
            .boxed(),
            ViewRequest::TransactionInfo(request) => async move {
                Ok::<_, ServiceError>(Reply::stream(transaction_info(&services, request).await?))
            }
            .boxed(),
            ViewRequest::Assets(_) => {
                async move { Ok::<_, ServiceError>(Reply::stream(assets(&services).await?)) }.boxed()
            }
            ViewRequest::EphemeralAddress(request) => async move {
                Reply::unary(&ephemeral_address(&services, request).await?)
            }
            .boxed(),
            ViewRequest::TransactionPlanner(request) => async move {
                Reply::unary(&transaction_planner(&services, request).await?)
            }
            .boxed(),
            ViewRequest::WitnessAndBuild(request) => async move {
                Reply::unary(&witness_and_build(&services, request).await?)
            }
            .boxed(),
            ViewRequest::BroadcastTransaction(request) => async move {
                Reply::unary(&broadcast_transaction(&services, request).await?)
            }
            .boxed(),
            ViewRequest::Unregistered { method } => {
                debug!(%method, "No view handler registered");
                return None;
            }
        };
        Some(reply)
    }
}

/// A request without an id, or an id the store has never seen, yields an
/// empty response.
pub async fn transaction_info_by_hash(
    services: &ServicesHandle,
    request: TransactionInfoByHashRequest,
) -> Result<TransactionInfoByHashResponse, ServiceError> {
    let Some(id) = request.id else {
        return Ok(TransactionInfoByHashResponse::default());
    };
    let services = services.wallet_services().await?;
    let tx_info = services.store.get_transaction_by_hash(&id).await?;
    Ok(TransactionInfoByHashResponse { tx_info })
}

pub async fn transaction_info(
    services: &ServicesHandle,
    request: TransactionInfoRequest,
) -> Result<Vec<TransactionInfoResponse>, ServiceError> {
    let services = services.wallet_services().await?;
    let transactions = services
        .store
        .list_transactions(request.start_height, request.end_height)
        .await?;
    Ok(transactions
        .into_iter()
        .map(|tx| TransactionInfoResponse { tx_info: Some(tx) })
        .collect())
}

pub async fn assets(services: &ServicesHandle) -> Result<Vec<AssetsResponse>, ServiceError> {
    let services = services.wallet_services().await?;
    let assets = services.store.list_assets().await?;
    Ok(assets
        .into_iter()
        .map(|metadata| AssetsResponse {
            denom_metadata: Some(metadata),
        })
        .collect())
}

pub async fn ephemeral_address(
    services: &ServicesHandle,
    request: EphemeralAddressRequest,
) -> Result<EphemeralAddressResponse, ServiceError> {
    let services = services.wallet_services().await?;
    let address = services.view.ephemeral_address(request.address_index).await?;
    Ok(EphemeralAddressResponse { address })
}

pub async fn transaction_planner(
    services: &ServicesHandle,
    request: TransactionPlannerRequest,
) -> Result<TransactionPlannerResponse, ServiceError> {
    let services = services.wallet_services().await?;
    let plan = services.view.plan_transaction(request).await?;
    Ok(TransactionPlannerResponse { plan })
}

pub async fn witness_and_build(
    services: &ServicesHandle,
    request: WitnessAndBuildRequest,
) -> Result<WitnessAndBuildResponse, ServiceError> {
    let plan = request
        .transaction_plan
        .ok_or_else(|| ServiceError::bad_request("missing transaction plan"))?;
    let authorization = request
        .authorization_data
        .ok_or_else(|| ServiceError::bad_request("missing authorization data"))?;
    let services = services.wallet_services().await?;
    let transaction = services.view.witness_and_build(plan, authorization).await?;
    Ok(WitnessAndBuildResponse { transaction })
}

pub async fn broadcast_transaction(
    services: &ServicesHandle,
    request: BroadcastTransactionRequest,
) -> Result<BroadcastTransactionResponse, ServiceError> {
    let transaction = request
        .transaction
        .ok_or_else(|| ServiceError::bad_request("missing transaction"))?;
    let services = services.wallet_services().await?;
    let id = services
        .view
        .broadcast_transaction(transaction, request.await_detection)
        .await?;
    if let Some(id) = &id {
        info!(tx_hash = %id, "Transaction broadcast");
    }
    Ok(BroadcastTransactionResponse { id })
}
