// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shielded Wallet Router - Background Request Router & Transaction Pipeline
//!
//! This crate runs in the wallet's privileged background context. It accepts
//! messages from the wallet's own pages and from connected web pages, routes
//! them to the view, custody and IBC-client services, and relays unary and
//! streaming responses back. It also drives IBC withdrawals through
//! plan, authorize, witness-and-build and broadcast.
//!
//! ## Modules
//!
//! - `auth` - Sender authentication and per-origin permissions
//! - `protocol` - Envelopes, discriminators, type registry, typed requests
//! - `api` - Root router and per-family service routers
//! - `relay` - Background listener and caller-side transport
//! - `client` - Typed wallet client and history/asset fetchers
//! - `pipeline` - Withdrawal pipeline, input builders and form state
//! - `services` - Collaborator traits (store, planner, custody, node)
//! - `storage` - Local transaction index (redb)
//! - `catalog` - Built-in assets and counterparty chains

pub mod api;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod protocol;
pub mod relay;
pub mod services;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
