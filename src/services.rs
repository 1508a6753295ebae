// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Collaborators the service routers delegate to.
//!
//! The routers own no wallet logic. Persistence, block sync, planning,
//! proving, custody and node queries live behind these traits and are
//! installed once through [`crate::state::ServicesHandle`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::{
    Address, AuthorizationData, IdentifiedClientState, Metadata, Transaction, TransactionId,
    TransactionInfo, TransactionPlan, TransactionPlannerRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("store error: {0}")]
    Store(String),

    #[error("node unreachable: {0}")]
    Node(String),

    #[error("{0}")]
    Rejected(String),
}

impl From<CollaboratorError> for ServiceError {
    fn from(err: CollaboratorError) -> Self {
        ServiceError::unavailable(err.to_string())
    }
}

/// Local transaction and asset index.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn get_transaction_by_hash(
        &self,
        id: &TransactionId,
    ) -> Result<Option<TransactionInfo>, CollaboratorError>;

    /// Transactions with `start <= height <= end`, ascending by height.
    async fn list_transactions(
        &self,
        start_height: Option<u64>,
        end_height: Option<u64>,
    ) -> Result<Vec<TransactionInfo>, CollaboratorError>;

    async fn list_assets(&self) -> Result<Vec<Metadata>, CollaboratorError>;
}

/// Block scanner that brings the local index up to date.
#[async_trait]
pub trait BlockProcessor: Send + Sync {
    async fn sync_blocks(&self) -> Result<(), CollaboratorError>;
}

/// Planning, proving and submission.
#[async_trait]
pub trait ViewBackend: Send + Sync {
    async fn ephemeral_address(
        &self,
        address_index: u32,
    ) -> Result<Option<Address>, CollaboratorError>;

    async fn plan_transaction(
        &self,
        request: TransactionPlannerRequest,
    ) -> Result<Option<TransactionPlan>, CollaboratorError>;

    async fn witness_and_build(
        &self,
        plan: TransactionPlan,
        authorization: AuthorizationData,
    ) -> Result<Option<Transaction>, CollaboratorError>;

    async fn broadcast_transaction(
        &self,
        transaction: Transaction,
        await_detection: bool,
    ) -> Result<Option<TransactionId>, CollaboratorError>;
}

/// Key custody; signs plans.
#[async_trait]
pub trait CustodyBackend: Send + Sync {
    async fn authorize(
        &self,
        plan: TransactionPlan,
    ) -> Result<Option<AuthorizationData>, CollaboratorError>;
}

/// Light-client queries against the node.
#[async_trait]
pub trait IbcClientBackend: Send + Sync {
    async fn client_states(&self) -> Result<Vec<IdentifiedClientState>, CollaboratorError>;
}

/// The full set of collaborators, installed once the wallet is unlocked.
#[derive(Clone)]
pub struct WalletServices {
    pub store: Arc<dyn TransactionStore>,
    pub block_processor: Arc<dyn BlockProcessor>,
    pub view: Arc<dyn ViewBackend>,
    pub custody: Arc<dyn CustodyBackend>,
    pub ibc: Arc<dyn IbcClientBackend>,
}
