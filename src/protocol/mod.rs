// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Cross-Context Message Contract
//!
//! Every request is an envelope `{ requestId, type: "<service>.<method>", payload }`.
//! The service half of `type` selects a [`ServiceFamily`] through the
//! [`TypeRegistry`] without looking at the payload; the method half selects a
//! variant of that family's closed request enum.
//!
//! Responses travel back as [`ResponseFrame`]s carrying the originating
//! `requestId`: one `unary` frame, or `item` frames followed by `end`, or a
//! single `error` frame.

pub mod discriminator;
pub mod envelope;
pub mod requests;

pub use discriminator::{
    Discriminator, RegistryError, ServiceFamily, TypeRegistry, CUSTODY_SERVICE,
    IBC_CLIENT_SERVICE, STD_SERVICE, VIEW_SERVICE,
};
pub use envelope::{FrameBody, RequestEnvelope, ResponseFrame};
pub use requests::*;
