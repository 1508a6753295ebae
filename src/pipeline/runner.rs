// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::builders::{build_plan_request, compute_timeout, validate_withdrawal};
use super::form::WithdrawalFormState;
use super::stage::{PipelineError, PipelineStage};
use crate::client::WalletClient;
use crate::config::RouterConfig;
use crate::protocol::{
    AuthorizeRequest, BroadcastTransactionRequest, EphemeralAddressRequest,
    QueryClientStatesRequest, WitnessAndBuildRequest,
};
use crate::relay::ClientError;

const PROGRESS_CAPACITY: usize = 16;

/// Clears an in-flight flag when a run ends, however it ends.
pub(super) struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    pub(super) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one withdrawal at a time through plan, authorize, build, broadcast.
pub struct TransactionPipeline {
    client: Arc<dyn WalletClient>,
    call_timeout: Option<Duration>,
    progress: broadcast::Sender<PipelineStage>,
    running: AtomicBool,
}

impl TransactionPipeline {
    /// `call_timeout` bounds every remote call; `None` waits indefinitely.
    pub fn new(client: Arc<dyn WalletClient>, call_timeout: Option<Duration>) -> Self {
        let (progress, _) = broadcast::channel(PROGRESS_CAPACITY);
        Self {
            client,
            call_timeout,
            progress,
            running: AtomicBool::new(false),
        }
    }

    pub fn from_config(client: Arc<dyn WalletClient>, config: &RouterConfig) -> Self {
        Self::new(client, config.remote_call_timeout)
    }

    /// Stage transitions of subsequent runs, each ending with a terminal stage.
    /// Runs never overlap, so the events of one run are contiguous.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineStage> {
        self.progress.subscribe()
    }

    /// Run a withdrawal and return the hex hash of the broadcast transaction.
    ///
    /// Fails with [`PipelineError::AlreadyInFlight`], without emitting any
    /// stage, while another run is in progress.
    pub async fn run(
        &self,
        form: &WithdrawalFormState,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        let _running =
            InFlightGuard::acquire(&self.running).ok_or(PipelineError::AlreadyInFlight)?;
        self.enter(PipelineStage::Idle);
        let result = self.execute(form, cancel).await;
        match &result {
            Ok(tx_hash) => {
                info!(%tx_hash, "Withdrawal broadcast");
                self.enter(PipelineStage::Confirmed);
            }
            Err(err) => {
                let stage = err.terminal_stage();
                warn!(%stage, error = %err, "Withdrawal did not complete");
                self.enter(stage);
            }
        }
        result
    }

    async fn execute(
        &self,
        form: &WithdrawalFormState,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        let intent = validate_withdrawal(form)?;

        self.advance(PipelineStage::Planning, cancel)?;
        let return_address = self
            .call(
                PipelineStage::Planning,
                cancel,
                self.client.ephemeral_address(EphemeralAddressRequest::default()),
            )
            .await?
            .address
            .ok_or(PipelineError::NoReturnAddress)?;
        let client_states = self
            .call(
                PipelineStage::Planning,
                cancel,
                self.client.client_states(QueryClientStatesRequest::default()),
            )
            .await?
            .client_states;
        let timeout = compute_timeout(Utc::now(), &intent.chain_id, &client_states)?;
        let request = build_plan_request(&intent, return_address, timeout);
        let plan = self
            .call(
                PipelineStage::Planning,
                cancel,
                self.client.transaction_planner(request),
            )
            .await?
            .plan
            .ok_or(PipelineError::NoPlan)?;

        self.advance(PipelineStage::Authorizing, cancel)?;
        let authorization = self
            .call(
                PipelineStage::Authorizing,
                cancel,
                self.client.authorize(AuthorizeRequest {
                    plan: Some(plan.clone()),
                }),
            )
            .await?
            .data
            .ok_or(PipelineError::NoAuthorizationData)?;

        self.advance(PipelineStage::Building, cancel)?;
        let transaction = self
            .call(
                PipelineStage::Building,
                cancel,
                self.client.witness_and_build(WitnessAndBuildRequest {
                    transaction_plan: Some(plan),
                    authorization_data: Some(authorization),
                }),
            )
            .await?
            .transaction
            .ok_or(PipelineError::NoTransaction)?;

        self.advance(PipelineStage::Broadcasting, cancel)?;
        let id = self
            .call(
                PipelineStage::Broadcasting,
                cancel,
                self.client.broadcast_transaction(BroadcastTransactionRequest {
                    transaction: Some(transaction),
                    await_detection: true,
                }),
            )
            .await?
            .id
            .ok_or(PipelineError::NoTransactionId)?;

        Ok(id.to_hex())
    }

    fn enter(&self, stage: PipelineStage) {
        info!(%stage, "Pipeline stage");
        let _ = self.progress.send(stage);
    }

    /// Move to `stage` unless the run was abandoned.
    fn advance(&self, stage: PipelineStage, cancel: &CancellationToken) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { stage });
        }
        self.enter(stage);
        Ok(())
    }

    /// One remote call, bounded by the call timeout. Calls before broadcasting
    /// also end early on cancellation.
    async fn call<T, F>(
        &self,
        stage: PipelineStage,
        cancel: &CancellationToken,
        call: F,
    ) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let bounded = async {
            let result = match self.call_timeout {
                Some(after) => tokio::time::timeout(after, call)
                    .await
                    .map_err(|_| PipelineError::Stalled { stage, after })?,
                None => call.await,
            };
            result.map_err(|source| PipelineError::Remote { stage, source })
        };

        if stage == PipelineStage::Broadcasting {
            return bounded.await;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Cancelled { stage }),
            result = bounded => result,
        }
    }
}
