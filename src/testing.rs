// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory wallet collaborators and wiring helpers for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::api::RootRouter;
use crate::auth::{MessageSender, OriginPermissions};
use crate::catalog;
use crate::client::{RelayWalletClient, WalletClient};
use crate::config::RouterConfig;
use crate::error::ServiceError;
use crate::models::{
    ActionPlan, Address, AuthorizationData, ClientState, Height, IdentifiedClientState, Metadata,
    Signature, Transaction, TransactionId, TransactionInfo, TransactionPlan,
    TransactionPlannerRequest,
};
use crate::pipeline::WithdrawalFormState;
use crate::protocol::{
    AuthorizeRequest, AuthorizeResponse, BroadcastTransactionRequest,
    BroadcastTransactionResponse, CustodyRequest, EphemeralAddressRequest,
    EphemeralAddressResponse, IbcClientRequest, QueryClientStatesRequest,
    QueryClientStatesResponse, StdRequest, TransactionPlannerResponse, ViewRequest,
    WitnessAndBuildRequest, WitnessAndBuildResponse,
};
use crate::relay::{BackgroundListener, ClientError, RelayTransport};
use crate::services::{
    BlockProcessor, CollaboratorError, CustodyBackend, IbcClientBackend, TransactionStore,
    ViewBackend, WalletServices,
};
use crate::state::ServicesHandle;

pub const EXTENSION_ID: &str = "walletextensionid";

/// Records every call by method name. Individual methods can be made to fail,
/// to return an empty payload, or to wait on a gate.
#[derive(Default)]
pub struct FakeWallet {
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashSet<&'static str>>,
    omissions: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
    client_states: Mutex<Vec<IdentifiedClientState>>,
    transactions: Mutex<Vec<TransactionInfo>>,
    assets: Mutex<Vec<Metadata>>,
    planned: Mutex<Vec<TransactionPlannerRequest>>,
    authorized: Mutex<Vec<TransactionPlan>>,
    built: Mutex<Vec<TransactionPlan>>,
    broadcast: Mutex<Vec<TransactionId>>,
}

fn client_state(chain_id: &str, revision_number: u64, revision_height: u64) -> IdentifiedClientState {
    IdentifiedClientState {
        client_id: format!("07-tendermint-{chain_id}"),
        client_state: Some(ClientState {
            chain_id: chain_id.to_string(),
            latest_height: Some(Height {
                revision_number,
                revision_height,
            }),
        }),
    }
}

impl FakeWallet {
    pub fn new() -> Arc<Self> {
        let fake = Self::default();
        *fake.client_states.lock().unwrap() = vec![
            client_state(catalog::OSMOSIS_TESTNET.chain_id, 5, 5_000),
            client_state(catalog::NOBLE_TESTNET.chain_id, 1, 800),
        ];
        *fake.assets.lock().unwrap() = catalog::known_assets();
        Arc::new(fake)
    }

    pub fn services(self: &Arc<Self>) -> WalletServices {
        WalletServices {
            store: self.clone(),
            block_processor: self.clone(),
            view: self.clone(),
            custody: self.clone(),
            ibc: self.clone(),
        }
    }

    pub fn fail(&self, method: &'static str) {
        self.failures.lock().unwrap().insert(method);
    }

    pub fn omit(&self, method: &'static str) {
        self.omissions.lock().unwrap().insert(method);
    }

    /// Make `method` wait until the returned gate is notified.
    pub fn gate(&self, method: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(method, gate.clone());
        gate
    }

    pub fn set_client_states(&self, states: Vec<IdentifiedClientState>) {
        *self.client_states.lock().unwrap() = states;
    }

    pub fn add_transaction(&self, info: TransactionInfo) {
        self.transactions.lock().unwrap().push(info);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn planned(&self) -> Vec<TransactionPlannerRequest> {
        self.planned.lock().unwrap().clone()
    }

    pub fn authorized_plans(&self) -> Vec<TransactionPlan> {
        self.authorized.lock().unwrap().clone()
    }

    pub fn built_plans(&self) -> Vec<TransactionPlan> {
        self.built.lock().unwrap().clone()
    }

    pub fn broadcast_ids(&self) -> Vec<TransactionId> {
        self.broadcast.lock().unwrap().clone()
    }

    async fn enter(&self, method: &'static str) -> Result<bool, CollaboratorError> {
        self.calls.lock().unwrap().push(method);
        let gate = self.gates.lock().unwrap().get(method).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failures.lock().unwrap().contains(method) {
            return Err(CollaboratorError::Node(format!("{method} failed")));
        }
        Ok(!self.omissions.lock().unwrap().contains(method))
    }
}

#[async_trait]
impl TransactionStore for FakeWallet {
    async fn get_transaction_by_hash(
        &self,
        id: &TransactionId,
    ) -> Result<Option<TransactionInfo>, CollaboratorError> {
        self.enter(ViewRequest::TRANSACTION_INFO_BY_HASH).await?;
        let transactions = self.transactions.lock().unwrap();
        Ok(transactions.iter().find(|tx| &tx.id == id).cloned())
    }

    async fn list_transactions(
        &self,
        start_height: Option<u64>,
        end_height: Option<u64>,
    ) -> Result<Vec<TransactionInfo>, CollaboratorError> {
        self.enter(ViewRequest::TRANSACTION_INFO).await?;
        let mut matching: Vec<_> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| start_height.map_or(true, |start| tx.height >= start))
            .filter(|tx| end_height.map_or(true, |end| tx.height <= end))
            .cloned()
            .collect();
        matching.sort_by_key(|tx| tx.height);
        Ok(matching)
    }

    async fn list_assets(&self) -> Result<Vec<Metadata>, CollaboratorError> {
        self.enter(ViewRequest::ASSETS).await?;
        Ok(self.assets.lock().unwrap().clone())
    }
}

#[async_trait]
impl BlockProcessor for FakeWallet {
    async fn sync_blocks(&self) -> Result<(), CollaboratorError> {
        self.enter(StdRequest::SYNC_BLOCKS).await?;
        Ok(())
    }
}

#[async_trait]
impl ViewBackend for FakeWallet {
    async fn ephemeral_address(
        &self,
        _address_index: u32,
    ) -> Result<Option<Address>, CollaboratorError> {
        let present = self.enter(ViewRequest::EPHEMERAL_ADDRESS).await?;
        Ok(present.then(|| Address { inner: vec![7; 80] }))
    }

    async fn plan_transaction(
        &self,
        request: TransactionPlannerRequest,
    ) -> Result<Option<TransactionPlan>, CollaboratorError> {
        let present = self.enter(ViewRequest::TRANSACTION_PLANNER).await?;
        self.planned.lock().unwrap().push(request.clone());
        Ok(present.then(|| TransactionPlan {
            actions: request
                .ics20_withdrawals
                .into_iter()
                .map(ActionPlan::Ics20Withdrawal)
                .collect(),
            chain_id: "penumbra-testnet-deimos-6".to_string(),
            expiry_height: 0,
        }))
    }

    async fn witness_and_build(
        &self,
        plan: TransactionPlan,
        authorization: AuthorizationData,
    ) -> Result<Option<Transaction>, CollaboratorError> {
        let present = self.enter(ViewRequest::WITNESS_AND_BUILD).await?;
        self.built.lock().unwrap().push(plan.clone());
        let mut bytes = serde_json::to_vec(&plan).map_err(|e| CollaboratorError::Rejected(e.to_string()))?;
        bytes.extend_from_slice(&authorization.effect_hash);
        Ok(present.then(|| Transaction { bytes }))
    }

    async fn broadcast_transaction(
        &self,
        transaction: Transaction,
        _await_detection: bool,
    ) -> Result<Option<TransactionId>, CollaboratorError> {
        let present = self.enter(ViewRequest::BROADCAST_TRANSACTION).await?;
        let id = transaction.id();
        self.broadcast.lock().unwrap().push(id.clone());
        self.add_transaction(TransactionInfo {
            height: 1,
            id: id.clone(),
            transaction,
            view: None,
        });
        Ok(present.then_some(id))
    }
}

#[async_trait]
impl CustodyBackend for FakeWallet {
    async fn authorize(
        &self,
        plan: TransactionPlan,
    ) -> Result<Option<AuthorizationData>, CollaboratorError> {
        let present = self.enter(CustodyRequest::AUTHORIZE).await?;
        self.authorized.lock().unwrap().push(plan);
        Ok(present.then(|| AuthorizationData {
            effect_hash: vec![1; 64],
            spend_auths: vec![Signature(vec![2; 64])],
        }))
    }
}

#[async_trait]
impl IbcClientBackend for FakeWallet {
    async fn client_states(&self) -> Result<Vec<IdentifiedClientState>, CollaboratorError> {
        self.enter(IbcClientRequest::CLIENT_STATES).await?;
        Ok(self.client_states.lock().unwrap().clone())
    }
}

fn remote(err: CollaboratorError) -> ClientError {
    ClientError::Remote(ServiceError::from(err))
}

/// Direct client for pipeline tests that do not need the relay.
#[async_trait]
impl WalletClient for FakeWallet {
    async fn ephemeral_address(
        &self,
        request: EphemeralAddressRequest,
    ) -> Result<EphemeralAddressResponse, ClientError> {
        let address = ViewBackend::ephemeral_address(self, request.address_index)
            .await
            .map_err(remote)?;
        Ok(EphemeralAddressResponse { address })
    }

    async fn client_states(
        &self,
        _request: QueryClientStatesRequest,
    ) -> Result<QueryClientStatesResponse, ClientError> {
        let client_states = IbcClientBackend::client_states(self).await.map_err(remote)?;
        Ok(QueryClientStatesResponse { client_states })
    }

    async fn transaction_planner(
        &self,
        request: TransactionPlannerRequest,
    ) -> Result<TransactionPlannerResponse, ClientError> {
        let plan = ViewBackend::plan_transaction(self, request).await.map_err(remote)?;
        Ok(TransactionPlannerResponse { plan })
    }

    async fn authorize(&self, request: AuthorizeRequest) -> Result<AuthorizeResponse, ClientError> {
        let plan = request
            .plan
            .ok_or_else(|| ClientError::Remote(ServiceError::bad_request("missing transaction plan")))?;
        let data = CustodyBackend::authorize(self, plan).await.map_err(remote)?;
        Ok(AuthorizeResponse { data })
    }

    async fn witness_and_build(
        &self,
        request: WitnessAndBuildRequest,
    ) -> Result<WitnessAndBuildResponse, ClientError> {
        let missing = |what: &str| ClientError::Remote(ServiceError::bad_request(format!("missing {what}")));
        let plan = request.transaction_plan.ok_or_else(|| missing("transaction plan"))?;
        let authorization = request
            .authorization_data
            .ok_or_else(|| missing("authorization data"))?;
        let transaction = ViewBackend::witness_and_build(self, plan, authorization)
            .await
            .map_err(remote)?;
        Ok(WitnessAndBuildResponse { transaction })
    }

    async fn broadcast_transaction(
        &self,
        request: BroadcastTransactionRequest,
    ) -> Result<BroadcastTransactionResponse, ClientError> {
        let transaction = request
            .transaction
            .ok_or_else(|| ClientError::Remote(ServiceError::bad_request("missing transaction")))?;
        let id = ViewBackend::broadcast_transaction(self, transaction, request.await_detection)
            .await
            .map_err(remote)?;
        Ok(BroadcastTransactionResponse { id })
    }
}

/// A filled-in withdrawal of `amount` UM to Osmosis.
pub fn withdrawal_form(amount: &str) -> WithdrawalFormState {
    WithdrawalFormState {
        asset: catalog::PENUMBRA.metadata(),
        amount: amount.to_string(),
        chain: Some(catalog::OSMOSIS_TESTNET.chain()),
        destination_address: Some("osmo1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn".to_string()),
    }
}

/// Root router over `fake` with default settings, where
/// `https://app.example.org` is a connected site.
pub fn router(fake: &Arc<FakeWallet>) -> RootRouter {
    let permissions = Arc::new(OriginPermissions::new());
    permissions.grant("https://app.example.org");
    RootRouter::from_config(
        &RouterConfig::new(EXTENSION_ID),
        permissions,
        ServicesHandle::ready(fake.services()),
    )
}

/// A running background listener serving `fake`, and a client attached to it
/// as an internal sender. Dropping the harness stops the listener.
pub struct Harness {
    pub client: RelayWalletClient,
    pub shutdown: CancellationToken,
    _listener: DropGuard,
}

pub fn connect(fake: &Arc<FakeWallet>) -> Harness {
    let config = RouterConfig::new(EXTENSION_ID);
    let (inbound_tx, inbound_rx) = mpsc::channel(16);
    let shutdown = CancellationToken::new();
    tokio::spawn(BackgroundListener::new(Arc::new(router(fake))).run(inbound_rx, shutdown.clone()));

    let transport = RelayTransport::from_config(
        inbound_tx,
        MessageSender::internal(EXTENSION_ID),
        &config,
    );
    Harness {
        client: RelayWalletClient::new(Arc::new(transport)),
        shutdown: shutdown.clone(),
        _listener: shutdown.drop_guard(),
    }
}
