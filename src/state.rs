// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::ServiceError;
use crate::services::WalletServices;

/// Shared, late-bound access to the wallet's collaborators.
///
/// Routers are built before the wallet is unlocked. Handlers that run before
/// [`ServicesHandle::install`] wait until services are available.
#[derive(Clone)]
pub struct ServicesHandle {
    tx: Arc<watch::Sender<Option<Arc<WalletServices>>>>,
    rx: watch::Receiver<Option<Arc<WalletServices>>>,
}

impl ServicesHandle {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn ready(services: WalletServices) -> Self {
        let handle = Self::new();
        handle.install(services);
        handle
    }

    /// Install (or replace) the collaborators.
    pub fn install(&self, services: WalletServices) {
        self.tx.send_replace(Some(Arc::new(services)));
        tracing::info!("Wallet services installed");
    }

    pub fn is_ready(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Current collaborators, waiting for installation if needed.
    pub async fn wallet_services(&self) -> Result<Arc<WalletServices>, ServiceError> {
        let mut rx = self.rx.clone();
        let installed = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| ServiceError::unavailable("wallet services were shut down"))?;
        (*installed)
            .clone()
            .ok_or_else(|| ServiceError::unavailable("wallet services are not installed"))
    }
}

impl Default for ServicesHandle {
    fn default() -> Self {
        Self::new()
    }
}
