// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request envelopes and response frames.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::discriminator::Discriminator;
use crate::error::ServiceError;

/// A request as it crosses the context boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub request_id: Uuid,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RequestEnvelope {
    pub fn new(request_id: Uuid, discriminator: &Discriminator, payload: serde_json::Value) -> Self {
        Self {
            request_id,
            type_name: discriminator.to_string(),
            payload,
        }
    }

    pub fn discriminator(&self) -> Option<Discriminator> {
        Discriminator::parse(&self.type_name)
    }
}

/// One message sent back to the caller of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFrame {
    pub request_id: Uuid,
    #[serde(rename = "type")]
    pub type_name: String,
    pub frame: FrameBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameBody {
    /// The single response of a unary method.
    Unary { payload: serde_json::Value },
    /// One element of a server stream; `seq` counts from zero.
    Item { seq: u64, payload: serde_json::Value },
    /// Normal end of a server stream after `count` items.
    End { count: u64 },
    /// Terminal failure. Ends a unary call or a stream.
    Error { error: ServiceError },
}

impl FrameBody {
    pub fn kind(&self) -> &'static str {
        match self {
            FrameBody::Unary { .. } => "unary",
            FrameBody::Item { .. } => "item",
            FrameBody::End { .. } => "end",
            FrameBody::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, FrameBody::Item { .. })
    }
}
