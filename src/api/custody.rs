// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use futures::future::FutureExt;
use tracing::{debug, info};

use super::{HandlerFuture, Reply, ServiceRouter};
use crate::auth::SenderIdentity;
use crate::error::ServiceError;
use crate::protocol::{AuthorizeRequest, AuthorizeResponse, CustodyRequest};
use crate::state::ServicesHandle;

pub struct CustodyRouter {
    services: ServicesHandle,
}

impl CustodyRouter {
    pub fn new(services: ServicesHandle) -> Self {
        Self { services }
    }
}

impl ServiceRouter for CustodyRouter {
    type Request = CustodyRequest;

    fn dispatch(&self, request: CustodyRequest, sender: &SenderIdentity) -> Option<HandlerFuture> {
        let services = self.services.clone();
        match request {
            CustodyRequest::Authorize(request) => {
                info!(sender = ?sender, "Authorization requested");
                Some(async move { Reply::unary(&authorize(&services, request).await?) }.boxed())
            }
            CustodyRequest::Unregistered { method } => {
                debug!(%method, "No custody handler registered");
                None
            }
        }
    }
}

/// Have custody sign a transaction plan.
pub async fn authorize(
    services: &ServicesHandle,
    request: AuthorizeRequest,
) -> Result<AuthorizeResponse, ServiceError> {
    let plan = request
        .plan
        .ok_or_else(|| ServiceError::bad_request("missing transaction plan"))?;
    let services = services.wallet_services().await?;
    let data = services.custody.authorize(plan).await?;
    Ok(AuthorizeResponse { data })
}
