// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Response Relay
//!
//! The browser runtime delivers each message together with a way to answer
//! it. Here that pairing is an [`InboundMessage`]: the raw message, the
//! runtime-reported sender, and the caller's response channel.
//!
//! - [`server::BackgroundListener`] runs in the background context. It routes
//!   every inbound message and, for the ones that were claimed, forwards the
//!   handler's outcome as [`ResponseFrame`]s tagged with the request id.
//! - [`client::RelayTransport`] runs in a caller context. It sends envelopes,
//!   reads each call's frames from that call's own channel, and checks stream
//!   ordering so that truncation is reported instead of passing silently.

use tokio::sync::mpsc;

use crate::auth::MessageSender;
use crate::protocol::ResponseFrame;

pub mod client;
pub mod server;

pub use client::{ClientError, RelayTransport, ResponseStream};
pub use server::{forward_reply, BackgroundListener};

/// A message as handed over by the browser runtime.
#[derive(Debug)]
pub struct InboundMessage {
    pub message: serde_json::Value,
    pub sender: MessageSender,
    /// Response channel of this one call. Dropping it without a terminal
    /// frame fails the call on the caller's side.
    pub respond: mpsc::Sender<ResponseFrame>,
}
