// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Caller side of the relay.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::InboundMessage;
use crate::auth::MessageSender;
use crate::config::RouterConfig;
use crate::error::ServiceError;
use crate::protocol::{Discriminator, FrameBody, RequestEnvelope, ResponseFrame};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport closed before the call completed")]
    TransportClosed,

    /// Failure reported by the handler, with its message unchanged.
    #[error("{}", .0.message)]
    Remote(ServiceError),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unexpected {0} frame")]
    UnexpectedFrame(&'static str),

    #[error("stream item out of order: expected {expected}, got {got}")]
    OutOfOrder { expected: u64, got: u64 },

    #[error("stream truncated: {received} of {expected} items arrived")]
    Truncated { expected: u64, received: u64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Sends requests to the background context.
///
/// Every call gets its own response channel, so overlapping calls never see
/// each other's frames. When the background side lets go of a call without a
/// terminal frame (unclaimed message, aborted or failed handler, shutdown) the
/// call ends with [`ClientError::TransportClosed`].
#[derive(Debug, Clone)]
pub struct RelayTransport {
    inbound: mpsc::Sender<InboundMessage>,
    sender: MessageSender,
    buffer: usize,
}

impl RelayTransport {
    /// Attach to a background listener's inbound channel, presenting `sender`
    /// as this context's identity. `buffer` bounds each call's response channel.
    pub fn connect(
        inbound: mpsc::Sender<InboundMessage>,
        sender: MessageSender,
        buffer: usize,
    ) -> Self {
        Self {
            inbound,
            sender,
            buffer: buffer.max(1),
        }
    }

    pub fn from_config(
        inbound: mpsc::Sender<InboundMessage>,
        sender: MessageSender,
        config: &RouterConfig,
    ) -> Self {
        Self::connect(inbound, sender, config.response_buffer)
    }

    /// Call a unary method.
    pub async fn unary<Req, Resp>(
        &self,
        method: &Discriminator,
        request: &Req,
    ) -> Result<Resp, ClientError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let mut call = self.send(method, request).await?;
        match call.recv().await? {
            FrameBody::Unary { payload } => {
                serde_json::from_value(payload).map_err(ClientError::Decode)
            }
            FrameBody::Error { error } => Err(ClientError::Remote(error)),
            other => Err(ClientError::UnexpectedFrame(other.kind())),
        }
    }

    /// Call a server-streaming method.
    pub async fn server_stream<Req, Resp>(
        &self,
        method: &Discriminator,
        request: &Req,
    ) -> Result<ResponseStream<Resp>, ClientError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let call = self.send(method, request).await?;
        Ok(ResponseStream {
            call,
            next_seq: 0,
            done: false,
            _item: PhantomData,
        })
    }

    async fn send<Req: Serialize>(
        &self,
        method: &Discriminator,
        request: &Req,
    ) -> Result<PendingCall, ClientError> {
        let request_id = Uuid::new_v4();
        let payload = serde_json::to_value(request).map_err(ClientError::Encode)?;
        let envelope = RequestEnvelope::new(request_id, method, payload);
        let message = serde_json::to_value(&envelope).map_err(ClientError::Encode)?;

        let (respond, frames) = mpsc::channel(self.buffer);
        self.inbound
            .send(InboundMessage {
                message,
                sender: self.sender.clone(),
                respond,
            })
            .await
            .map_err(|_| ClientError::TransportClosed)?;
        Ok(PendingCall { request_id, frames })
    }
}

/// Response side of one call. Dropping it tells the handler to stop sending.
struct PendingCall {
    request_id: Uuid,
    frames: mpsc::Receiver<ResponseFrame>,
}

impl PendingCall {
    async fn recv(&mut self) -> Result<FrameBody, ClientError> {
        loop {
            let frame = self
                .frames
                .recv()
                .await
                .ok_or(ClientError::TransportClosed)?;
            if frame.request_id == self.request_id {
                return Ok(frame.frame);
            }
            debug!(
                request_id = %self.request_id,
                got = %frame.request_id,
                "Dropping frame addressed to another call"
            );
        }
    }
}

/// Items of a server stream, checked for order and completeness.
///
/// Ends with `None` after the `end` frame, or with exactly one `Err` on any
/// failure: an error frame, a gap in sequence numbers, a count mismatch, or the
/// transport closing early.
pub struct ResponseStream<T> {
    call: PendingCall,
    next_seq: u64,
    done: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> ResponseStream<T> {
    pub async fn next(&mut self) -> Option<Result<T, ClientError>> {
        if self.done {
            return None;
        }
        let body = match self.call.recv().await {
            Ok(body) => body,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };
        match body {
            FrameBody::Item { seq, payload } if seq == self.next_seq => {
                self.next_seq += 1;
                let item = serde_json::from_value(payload).map_err(ClientError::Decode);
                self.done = item.is_err();
                Some(item)
            }
            FrameBody::Item { seq, .. } => {
                self.done = true;
                Some(Err(ClientError::OutOfOrder {
                    expected: self.next_seq,
                    got: seq,
                }))
            }
            FrameBody::End { count } => {
                self.done = true;
                (count != self.next_seq).then(|| {
                    Err(ClientError::Truncated {
                        expected: count,
                        received: self.next_seq,
                    })
                })
            }
            FrameBody::Error { error } => {
                self.done = true;
                Some(Err(ClientError::Remote(error)))
            }
            FrameBody::Unary { .. } => {
                self.done = true;
                Some(Err(ClientError::UnexpectedFrame("unary")))
            }
        }
    }

    /// Collect every item, or fail with the stream's single terminal error.
    pub async fn collect(mut self) -> Result<Vec<T>, ClientError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }
}
