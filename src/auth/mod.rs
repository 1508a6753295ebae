// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Sender Authentication
//!
//! Every inbound cross-context message is classified before any dispatch.
//!
//! ## Trust Rules
//!
//! 1. One of the wallet's own pages opened in a tab (our extension id, and a
//!    `chrome-extension://<our id>/` URL) is internal.
//! 2. Any other message from a browser tab is trusted when the tab policy
//!    allows it:
//!    - `ConnectedOrigins` (default): the tab's origin must have been granted
//!      through the connect flow
//!    - `AnyTab`: any tab with an id is accepted
//! 3. A message without a tab is trusted only if its extension id is ours.
//! 4. Anything else is untrusted and dropped without a response.
//!
//! The identity is recomputed for every message and never persisted.

pub mod error;
pub mod permissions;
pub mod sender;

pub use error::AuthError;
pub use permissions::{origin_of, OriginPermissions, TabTrustPolicy};
pub use sender::{MessageSender, SenderAuthenticator, SenderIdentity, TabInfo};
