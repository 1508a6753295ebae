// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Routing
//!
//! [`RootRouter`] is the single entry point for messages arriving from other
//! contexts. It authenticates the sender, classifies the envelope through the
//! [`TypeRegistry`], decodes the family's typed request and hands it to that
//! family's [`ServiceRouter`].
//!
//! Messages from untrusted senders, malformed envelopes, unknown services and
//! methods no router serves produce no handler call and no response, so another
//! listener in the same context may still claim them.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{BoxStream, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{MessageSender, OriginPermissions, SenderAuthenticator, SenderIdentity};
use crate::config::RouterConfig;
use crate::error::ServiceError;
use crate::protocol::{RequestEnvelope, ServiceFamily, TypeRegistry, WalletRequest};
use crate::state::ServicesHandle;

pub mod custody;
pub mod ibc_client;
pub mod standard;
pub mod view;

pub use custody::CustodyRouter;
pub use ibc_client::IbcClientRouter;
pub use standard::StdRouter;
pub use view::ViewRouter;

pub type ReplyStream = BoxStream<'static, Result<serde_json::Value, ServiceError>>;

/// Eventual outcome of a dispatched request.
pub type HandlerFuture = BoxFuture<'static, Result<Reply, ServiceError>>;

/// What a handler produced.
pub enum Reply {
    Unary(serde_json::Value),
    Stream(ReplyStream),
}

impl Reply {
    pub fn unary<T: Serialize>(response: &T) -> Result<Self, ServiceError> {
        Ok(Self::Unary(serde_json::to_value(response)?))
    }

    pub fn stream<T: Serialize + Send + 'static>(items: Vec<T>) -> Self {
        Self::Stream(
            futures::stream::iter(items)
                .map(|item| serde_json::to_value(item).map_err(ServiceError::from))
                .boxed(),
        )
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Unary(value) => f.debug_tuple("Unary").field(value).finish(),
            Reply::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Dispatches one family's typed requests to handlers.
pub trait ServiceRouter: Send + Sync {
    type Request;

    /// Start handling a request. `None` means the method is not served here.
    fn dispatch(&self, request: Self::Request, sender: &SenderIdentity) -> Option<HandlerFuture>;
}

/// A request that was accepted and is being handled.
pub struct Routed {
    pub request_id: Uuid,
    pub type_name: String,
    pub family: ServiceFamily,
    pub reply: HandlerFuture,
}

impl fmt::Debug for Routed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routed")
            .field("request_id", &self.request_id)
            .field("type_name", &self.type_name)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

pub struct RootRouter {
    authenticator: SenderAuthenticator,
    registry: TypeRegistry,
    std: StdRouter,
    view: ViewRouter,
    custody: CustodyRouter,
    ibc_client: IbcClientRouter,
}

impl RootRouter {
    pub fn new(
        authenticator: SenderAuthenticator,
        registry: TypeRegistry,
        services: ServicesHandle,
    ) -> Self {
        Self {
            authenticator,
            registry,
            std: StdRouter::new(services.clone()),
            view: ViewRouter::new(services.clone()),
            custody: CustodyRouter::new(services.clone()),
            ibc_client: IbcClientRouter::new(services),
        }
    }

    pub fn from_config(
        config: &RouterConfig,
        permissions: Arc<OriginPermissions>,
        services: ServicesHandle,
    ) -> Self {
        let authenticator =
            SenderAuthenticator::new(config.extension_id.clone(), config.tab_trust, permissions);
        Self::new(authenticator, TypeRegistry::standard(), services)
    }

    /// The sender authenticator, whose permissions the connect flow updates.
    pub fn authenticator(&self) -> &SenderAuthenticator {
        &self.authenticator
    }

    /// Route one inbound message. `None` means "not handled here".
    pub fn route(&self, message: serde_json::Value, sender: &MessageSender) -> Option<Routed> {
        let identity = match self.authenticator.authenticate(sender) {
            Ok(identity) => identity,
            Err(err) => {
                debug!(reason = err.error_code(), error = %err, "Ignoring message from untrusted sender");
                return None;
            }
        };

        let envelope: RequestEnvelope = match serde_json::from_value(message) {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!(error = %err, "Ignoring message without a request envelope");
                return None;
            }
        };
        let Some(discriminator) = envelope.discriminator() else {
            debug!(type_name = %envelope.type_name, "Ignoring malformed type tag");
            return None;
        };
        let Some(family) = self.registry.classify(&discriminator) else {
            debug!(service = %discriminator.service, "Ignoring request for unknown service");
            return None;
        };

        let RequestEnvelope {
            request_id,
            type_name,
            payload,
        } = envelope;
        let routed = |reply: HandlerFuture| Routed {
            request_id,
            type_name: type_name.clone(),
            family,
            reply,
        };

        let request = match WalletRequest::decode(family, &discriminator.method, payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(
                    request_id = %request_id,
                    method = %discriminator,
                    error = %err,
                    "Rejecting request with invalid payload"
                );
                let error = ServiceError::bad_request(err.to_string());
                return Some(routed(futures::future::ready(Err(error)).boxed()));
            }
        };

        let reply = match request {
            WalletRequest::Std(request) => self.std.dispatch(request, &identity),
            WalletRequest::View(request) => self.view.dispatch(request, &identity),
            WalletRequest::Custody(request) => self.custody.dispatch(request, &identity),
            WalletRequest::IbcClient(request) => self.ibc_client.dispatch(request, &identity),
        }?;

        debug!(
            request_id = %request_id,
            method = %discriminator,
            family = %family,
            sender = ?identity,
            "Dispatched request"
        );
        Some(routed(reply))
    }
}
