// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed clients for callers outside the background context.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::TransactionPlannerRequest;
use crate::protocol::{
    AssetsRequest, AssetsResponse, AuthorizeRequest, AuthorizeResponse,
    BroadcastTransactionRequest, BroadcastTransactionResponse, CustodyRequest, Discriminator,
    EphemeralAddressRequest, EphemeralAddressResponse, IbcClientRequest, QueryClientStatesRequest,
    QueryClientStatesResponse, StdRequest, SyncBlocksRequest, SyncBlocksResponse,
    TransactionInfoByHashRequest, TransactionInfoByHashResponse, TransactionInfoRequest,
    TransactionInfoResponse, TransactionPlannerResponse, ViewRequest, WitnessAndBuildRequest,
    WitnessAndBuildResponse, CUSTODY_SERVICE, IBC_CLIENT_SERVICE, STD_SERVICE, VIEW_SERVICE,
};
use crate::relay::{ClientError, RelayTransport, ResponseStream};

pub mod fetchers;

pub use fetchers::{get_all_assets, get_all_transactions, get_tx_info_by_hash, TransactionSummary};

/// The remote calls a withdrawal needs.
#[async_trait]
pub trait WalletClient: Send + Sync {
    async fn ephemeral_address(
        &self,
        request: EphemeralAddressRequest,
    ) -> Result<EphemeralAddressResponse, ClientError>;

    async fn client_states(
        &self,
        request: QueryClientStatesRequest,
    ) -> Result<QueryClientStatesResponse, ClientError>;

    async fn transaction_planner(
        &self,
        request: TransactionPlannerRequest,
    ) -> Result<TransactionPlannerResponse, ClientError>;

    async fn authorize(&self, request: AuthorizeRequest) -> Result<AuthorizeResponse, ClientError>;

    async fn witness_and_build(
        &self,
        request: WitnessAndBuildRequest,
    ) -> Result<WitnessAndBuildResponse, ClientError>;

    async fn broadcast_transaction(
        &self,
        request: BroadcastTransactionRequest,
    ) -> Result<BroadcastTransactionResponse, ClientError>;
}

fn view(method: &str) -> Discriminator {
    Discriminator::new(VIEW_SERVICE, method)
}

/// [`WalletClient`] over the relay, plus the read-only view calls.
#[derive(Clone)]
pub struct RelayWalletClient {
    transport: Arc<RelayTransport>,
}

impl RelayWalletClient {
    pub fn new(transport: Arc<RelayTransport>) -> Self {
        Self { transport }
    }

    pub async fn sync_blocks(&self) -> Result<SyncBlocksResponse, ClientError> {
        let method = Discriminator::new(STD_SERVICE, StdRequest::SYNC_BLOCKS);
        self.transport.unary(&method, &SyncBlocksRequest {}).await
    }

    pub async fn transaction_info_by_hash(
        &self,
        request: TransactionInfoByHashRequest,
    ) -> Result<TransactionInfoByHashResponse, ClientError> {
        self.transport
            .unary(&view(ViewRequest::TRANSACTION_INFO_BY_HASH), &request)
            .await
    }

    pub async fn transaction_info(
        &self,
        request: TransactionInfoRequest,
    ) -> Result<ResponseStream<TransactionInfoResponse>, ClientError> {
        self.transport
            .server_stream(&view(ViewRequest::TRANSACTION_INFO), &request)
            .await
    }

    pub async fn assets(
        &self,
        request: AssetsRequest,
    ) -> Result<ResponseStream<AssetsResponse>, ClientError> {
        self.transport
            .server_stream(&view(ViewRequest::ASSETS), &request)
            .await
    }
}

#[async_trait]
impl WalletClient for RelayWalletClient {
    async fn ephemeral_address(
        &self,
        request: EphemeralAddressRequest,
    ) -> Result<EphemeralAddressResponse, ClientError> {
        self.transport
            .unary(&view(ViewRequest::EPHEMERAL_ADDRESS), &request)
            .await
    }

    async fn client_states(
        &self,
        request: QueryClientStatesRequest,
    ) -> Result<QueryClientStatesResponse, ClientError> {
        let method = Discriminator::new(IBC_CLIENT_SERVICE, IbcClientRequest::CLIENT_STATES);
        self.transport.unary(&method, &request).await
    }

    async fn transaction_planner(
        &self,
        request: TransactionPlannerRequest,
    ) -> Result<TransactionPlannerResponse, ClientError> {
        self.transport
            .unary(&view(ViewRequest::TRANSACTION_PLANNER), &request)
            .await
    }

    async fn authorize(&self, request: AuthorizeRequest) -> Result<AuthorizeResponse, ClientError> {
        let method = Discriminator::new(CUSTODY_SERVICE, CustodyRequest::AUTHORIZE);
        self.transport.unary(&method, &request).await
    }

    async fn witness_and_build(
        &self,
        request: WitnessAndBuildRequest,
    ) -> Result<WitnessAndBuildResponse, ClientError> {
        self.transport
            .unary(&view(ViewRequest::WITNESS_AND_BUILD), &request)
            .await
    }

    async fn broadcast_transaction(
        &self,
        request: BroadcastTransactionRequest,
    ) -> Result<BroadcastTransactionResponse, ClientError> {
        self.transport
            .unary(&view(ViewRequest::BROADCAST_TRANSACTION), &request)
            .await
    }
}
