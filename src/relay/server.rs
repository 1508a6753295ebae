// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Background side of the relay.
//!
//! ## Shutdown
//!
//! [`BackgroundListener::run`] stops on its `CancellationToken` and aborts
//! requests still in flight. When the inbound channel closes instead, in-flight
//! requests are allowed to finish first.
//!
//! A handler that panics still ends its call with an `error` frame.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::InboundMessage;
use crate::api::{Reply, RootRouter, Routed};
use crate::error::ServiceError;
use crate::protocol::{FrameBody, ResponseFrame};

/// Await a routed request and send its outcome back as frames.
///
/// A unary reply yields one `unary` frame. A stream yields `item` frames in
/// order and then `end`, or stops at the first `error` frame. Returns early if
/// the caller has gone away.
pub async fn forward_reply(routed: Routed, respond: mpsc::Sender<ResponseFrame>) {
    let Routed {
        request_id,
        type_name,
        reply,
        ..
    } = routed;
    let frame = |body: FrameBody| ResponseFrame {
        request_id,
        type_name: type_name.clone(),
        frame: body,
    };

    let mut stream = match reply.await {
        Ok(Reply::Unary(payload)) => {
            let _ = respond.send(frame(FrameBody::Unary { payload })).await;
            return;
        }
        Ok(Reply::Stream(stream)) => stream,
        Err(error) => {
            debug!(%request_id, error = %error, "Request failed");
            let _ = respond.send(frame(FrameBody::Error { error })).await;
            return;
        }
    };

    let mut count = 0u64;
    while let Some(item) = stream.next().await {
        let body = match item {
            Ok(payload) => FrameBody::Item {
                seq: count,
                payload,
            },
            Err(error) => {
                debug!(%request_id, sent = count, error = %error, "Stream failed");
                let _ = respond.send(frame(FrameBody::Error { error })).await;
                return;
            }
        };
        if respond.send(frame(body)).await.is_err() {
            debug!(%request_id, sent = count, "Caller went away mid-stream");
            return;
        }
        count += 1;
    }
    let _ = respond.send(frame(FrameBody::End { count })).await;
}

/// [`forward_reply`], with a handler panic turned into a final `error` frame.
async fn serve(routed: Routed, respond: mpsc::Sender<ResponseFrame>) {
    let request_id = routed.request_id;
    let type_name = routed.type_name.clone();
    let fallback = respond.clone();

    if AssertUnwindSafe(forward_reply(routed, respond))
        .catch_unwind()
        .await
        .is_err()
    {
        warn!(%request_id, %type_name, "Request handler panicked");
        let frame = ResponseFrame {
            request_id,
            type_name,
            frame: FrameBody::Error {
                error: ServiceError::internal("request handler failed"),
            },
        };
        let _ = fallback.send(frame).await;
    }
}

/// Background message loop.
pub struct BackgroundListener {
    router: Arc<RootRouter>,
}

impl BackgroundListener {
    pub fn new(router: Arc<RootRouter>) -> Self {
        Self { router }
    }

    /// Run until `shutdown` fires or the inbound channel closes.
    pub async fn run(self, mut inbound: mpsc::Receiver<InboundMessage>, shutdown: CancellationToken) {
        info!("Background listener started");
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(in_flight = in_flight.len(), "Background listener shutting down");
                    in_flight.shutdown().await;
                    return;
                }
                message = inbound.recv() => {
                    let Some(message) = message else { break };
                    self.accept(message, &mut in_flight);
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(err) = joined {
                        warn!(error = %err, "Request task ended abnormally");
                    }
                }
            }
        }

        debug!(in_flight = in_flight.len(), "Inbound channel closed, draining");
        while let Some(joined) = in_flight.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "Request task ended abnormally");
            }
        }
        info!("Background listener stopped");
    }

    fn accept(&self, message: InboundMessage, in_flight: &mut JoinSet<()>) {
        let InboundMessage {
            message,
            sender,
            respond,
        } = message;
        if let Some(routed) = self.router.route(message, &sender) {
            in_flight.spawn(serve(routed, respond));
        }
    }
}
