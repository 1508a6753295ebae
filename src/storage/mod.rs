// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Wallet Index
//!
//! The background context keeps the wallet's own transactions and known
//! assets in an embedded [redb](https://docs.rs/redb) database. The block
//! processor writes to it while syncing; the view router only reads.
//!
//! ## Table Layout
//!
//! ```text
//! transactions   hex tx id          -> TransactionInfo (JSON)
//! height_index   height_be | id     -> hex tx id
//! assets         hex asset id       -> Metadata (JSON)
//! ```

pub mod tx_database;

pub use tx_database::{TxDatabase, TxDbError, TxDbResult};
