// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use futures::future::FutureExt;
use tracing::debug;

use super::{HandlerFuture, Reply, ServiceRouter};
use crate::auth::SenderIdentity;
use crate::error::ServiceError;
use crate::protocol::{IbcClientRequest, QueryClientStatesResponse};
use crate::state::ServicesHandle;

pub struct IbcClientRouter {
    services: ServicesHandle,
}

impl IbcClientRouter {
    pub fn new(services: ServicesHandle) -> Self {
        Self { services }
    }
}

impl ServiceRouter for IbcClientRouter {
    type Request = IbcClientRequest;

    fn dispatch(&self, request: IbcClientRequest, _sender: &SenderIdentity) -> Option<HandlerFuture> {
        let services = self.services.clone();
        match request {
            IbcClientRequest::ClientStates(_) => {
                Some(async move { Reply::unary(&client_states(&services).await?) }.boxed())
            }
            IbcClientRequest::Unregistered { method } => {
                debug!(%method, "No IBC client handler registered");
                None
            }
        }
    }
}

/// Light-client states of every counterparty chain the node tracks.
pub async fn client_states(
    services: &ServicesHandle,
) -> Result<QueryClientStatesResponse, ServiceError> {
    let services = services.wallet_services().await?;
    let client_states = services.ibc.client_states().await?;
    Ok(QueryClientStatesResponse { client_states })
}
