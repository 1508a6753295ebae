// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Withdrawal form state and user notifications.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::runner::{InFlightGuard, TransactionPipeline};
use super::stage::PipelineError;
use crate::catalog;
use crate::models::{AssetId, Chain, Metadata};

/// What the user has entered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalFormState {
    pub asset: Metadata,
    /// Decimal amount in the asset's display unit, as typed
    pub amount: String,
    pub chain: Option<Chain>,
    pub destination_address: Option<String>,
}

impl WithdrawalFormState {
    pub fn new(asset: Metadata) -> Self {
        Self {
            asset,
            amount: String::new(),
            chain: None,
            destination_address: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

/// User-facing progress reports for a submission.
pub trait Notifier: Send + Sync {
    /// Show a persistent "in progress" notice.
    fn pending(&self) -> NotificationId;
    fn dismiss(&self, id: NotificationId);
    fn success(&self, tx_hash: &str);
    fn failure(&self, error: &PipelineError);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Pending(NotificationId),
    Dismissed(NotificationId),
    Success { tx_hash: String },
    Failure { message: String },
}

/// [`Notifier`] that forwards every notice over a channel.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
    next_id: AtomicU64,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Self {
            tx,
            next_id: AtomicU64::new(1),
        };
        (notifier, rx)
    }

    fn emit(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}

impl Notifier for ChannelNotifier {
    fn pending(&self) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.emit(Notification::Pending(id));
        id
    }

    fn dismiss(&self, id: NotificationId) {
        self.emit(Notification::Dismissed(id));
    }

    fn success(&self, tx_hash: &str) {
        self.emit(Notification::Success {
            tx_hash: tx_hash.to_string(),
        });
    }

    fn failure(&self, error: &PipelineError) {
        self.emit(Notification::Failure {
            message: error.to_string(),
        });
    }
}

/// A withdrawal form with at most one submission in flight.
pub struct WithdrawalForm {
    state: Mutex<WithdrawalFormState>,
    in_flight: AtomicBool,
}

impl WithdrawalForm {
    pub fn new(asset: Metadata) -> Self {
        Self {
            state: Mutex::new(WithdrawalFormState::new(asset)),
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WithdrawalFormState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> WithdrawalFormState {
        self.lock().clone()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Select an asset from the built-in catalogue.
    pub fn set_asset(&self, id: &AssetId) -> Result<(), PipelineError> {
        let asset =
            catalog::find_asset(id).ok_or_else(|| PipelineError::UnknownAsset(hex::encode(&id.inner)))?;
        self.lock().asset = asset;
        Ok(())
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        self.lock().amount = amount.into();
    }

    pub fn set_chain(&self, chain: Option<Chain>) {
        self.lock().chain = chain;
    }

    pub fn set_destination_address(&self, address: impl Into<String>) {
        self.lock().destination_address = Some(address.into());
    }

    /// Run a withdrawal from the current form contents.
    ///
    /// Edits made while the run is in flight do not affect it. On success the
    /// amount is cleared. A cancelled run dismisses the pending notice without
    /// reporting a failure.
    pub async fn submit(
        &self,
        pipeline: &TransactionPipeline,
        notifier: &dyn Notifier,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        let _in_flight = InFlightGuard::acquire(&self.in_flight).ok_or(PipelineError::AlreadyInFlight)?;
        let snapshot = self.snapshot();
        let notice = notifier.pending();

        let result = pipeline.run(&snapshot, cancel).await;
        notifier.dismiss(notice);

        match &result {
            Ok(tx_hash) => {
                self.lock().amount.clear();
                notifier.success(tx_hash);
            }
            Err(PipelineError::Cancelled { stage }) => {
                info!(%stage, "Withdrawal abandoned");
            }
            Err(err) => notifier.failure(err),
        }
        result
    }
}

impl Default for WithdrawalForm {
    fn default() -> Self {
        Self::new(catalog::PENUMBRA.metadata())
    }
}
