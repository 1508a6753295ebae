// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet-internal control messages.

use futures::future::FutureExt;
use tracing::debug;

use super::{HandlerFuture, Reply, ServiceRouter};
use crate::auth::SenderIdentity;
use crate::error::ServiceError;
use crate::protocol::{StdRequest, SyncBlocksResponse};
use crate::state::ServicesHandle;

pub struct StdRouter {
    services: ServicesHandle,
}

impl StdRouter {
    pub fn new(services: ServicesHandle) -> Self {
        Self { services }
    }
}

impl ServiceRouter for StdRouter {
    type Request = StdRequest;

    fn dispatch(&self, request: StdRequest, _sender: &SenderIdentity) -> Option<HandlerFuture> {
        let services = self.services.clone();
        match request {
            StdRequest::SyncBlocks(_) => {
                Some(async move { Reply::unary(&sync_blocks(&services).await?) }.boxed())
            }
            StdRequest::Unregistered { method } => {
                debug!(%method, "No std handler registered");
                None
            }
        }
    }
}

/// Ask the block processor to catch up with the chain.
pub async fn sync_blocks(services: &ServicesHandle) -> Result<SyncBlocksResponse, ServiceError> {
    let services = services.wallet_services().await?;
    services.block_processor.sync_blocks().await?;
    Ok(SyncBlocksResponse {})
}
