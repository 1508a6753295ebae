// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::relay::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Planning,
    Authorizing,
    Building,
    Broadcasting,
    Confirmed,
    Failed,
    /// A remote call exceeded its time bound.
    Stalled,
    /// The caller abandoned the run before broadcasting.
    Cancelled,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Planning => "planning",
            PipelineStage::Authorizing => "authorizing",
            PipelineStage::Building => "building",
            PipelineStage::Broadcasting => "broadcasting",
            PipelineStage::Confirmed => "confirmed",
            PipelineStage::Failed => "failed",
            PipelineStage::Stalled => "stalled",
            PipelineStage::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineStage::Confirmed
                | PipelineStage::Failed
                | PipelineStage::Stalled
                | PipelineStage::Cancelled
        )
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    // Form validation
    #[error("no destination chain address set")]
    MissingDestinationAddress,

    #[error("no destination chain selected")]
    MissingChain,

    #[error("Chain ibc channel not available")]
    MissingChannel,

    #[error("invalid destination address: {0}")]
    InvalidDestinationAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("unknown asset {0}")]
    UnknownAsset(String),

    #[error("a withdrawal is already in progress")]
    AlreadyInFlight,

    // Planning
    #[error("Error with generating ephemeral return address")]
    NoReturnAddress,

    #[error("Could not find chain id client state")]
    UnknownChain(String),

    #[error("client state for {0} has no latest height")]
    MissingLatestHeight(String),

    #[error("no plan in response")]
    NoPlan,

    // Authorizing, building, broadcasting
    #[error("no authorization data in response")]
    NoAuthorizationData,

    #[error("no transaction in response")]
    NoTransaction,

    #[error("no id in broadcast response")]
    NoTransactionId,

    #[error("{source}")]
    Remote {
        stage: PipelineStage,
        #[source]
        source: ClientError,
    },

    #[error("no response while {stage} after {after:?}")]
    Stalled { stage: PipelineStage, after: Duration },

    #[error("withdrawal abandoned while {stage}")]
    Cancelled { stage: PipelineStage },
}

impl PipelineError {
    /// State the run ends in after this error.
    pub fn terminal_stage(&self) -> PipelineStage {
        match self {
            PipelineError::Stalled { .. } => PipelineStage::Stalled,
            PipelineError::Cancelled { .. } => PipelineStage::Cancelled,
            _ => PipelineStage::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    #[test]
    fn messages_match_user_facing_text() {
        assert_eq!(
            PipelineError::MissingDestinationAddress.to_string(),
            "no destination chain address set"
        );
        assert_eq!(PipelineError::MissingChannel.to_string(), "Chain ibc channel not available");
        assert_eq!(PipelineError::NoPlan.to_string(), "no plan in response");
        assert_eq!(PipelineError::NoTransactionId.to_string(), "no id in broadcast response");
    }

    #[test]
    fn remote_errors_keep_the_handler_message() {
        let err = PipelineError::Remote {
            stage: PipelineStage::Authorizing,
            source: ClientError::Remote(ServiceError::unavailable("user denied")),
        };
        assert_eq!(err.to_string(), "user denied");
        assert_eq!(err.terminal_stage(), PipelineStage::Failed);
    }

    #[test]
    fn stalled_and_cancelled_are_distinct_outcomes() {
        let stalled = PipelineError::Stalled {
            stage: PipelineStage::Building,
            after: Duration::from_secs(5),
        };
        assert_eq!(stalled.terminal_stage(), PipelineStage::Stalled);
        assert_eq!(stalled.to_string(), "no response while building after 5s");

        let cancelled = PipelineError::Cancelled {
            stage: PipelineStage::Planning,
        };
        assert_eq!(cancelled.terminal_stage(), PipelineStage::Cancelled);
        assert!(PipelineStage::Stalled.is_terminal());
        assert!(!PipelineStage::Broadcasting.is_terminal());
    }
}
