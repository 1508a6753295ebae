// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # IBC Withdrawal Pipeline
//!
//! A withdrawal moves through four remote stages:
//!
//! ```text
//! Idle -> Planning -> Authorizing -> Building -> Broadcasting -> Confirmed
//!            \            \             \            \
//!             +------------+-------------+------------+--> Failed | Stalled
//! ```
//!
//! Form input is validated before any remote call. Each stage's output is the
//! next stage's input, and a stage whose response lacks its payload fails the
//! run with a stage-specific message. A run can be abandoned through a
//! `CancellationToken` up to the moment broadcasting starts; a broadcast is
//! never interrupted.

pub mod builders;
pub mod form;
pub mod runner;
pub mod stage;

pub use builders::{
    build_plan_request, compute_timeout, display_exponent, parse_base_units, validate_withdrawal,
    Timeout, WithdrawalIntent, TIMEOUT_HEIGHT_MARGIN, WITHDRAWAL_TIMEOUT,
};
pub use form::{
    ChannelNotifier, Notification, NotificationId, Notifier, WithdrawalForm, WithdrawalFormState,
};
pub use runner::TransactionPipeline;
pub use stage::{PipelineError, PipelineStage};
