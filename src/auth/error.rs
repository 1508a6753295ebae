// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

/// Reason a sender was classified as untrusted.
///
/// These never reach the caller; they are only logged so that the existence
/// of internal message types is not revealed to untrusted origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Neither a tab id nor an extension id was present
    MissingIdentity,
    /// Message came from another extension
    ForeignExtension(String),
    /// Tab had no URL with a tuple origin
    MissingOrigin { tab_id: i32 },
    /// Tab origin has not been granted access
    OriginNotConnected(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingIdentity => "missing_identity",
            AuthError::ForeignExtension(_) => "foreign_extension",
            AuthError::MissingOrigin { .. } => "missing_origin",
            AuthError::OriginNotConnected(_) => "origin_not_connected",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingIdentity => write!(f, "Sender carries no tab or extension identity"),
            AuthError::ForeignExtension(id) => write!(f, "Sender extension {id} is not this wallet"),
            AuthError::MissingOrigin { tab_id } => {
                write!(f, "Tab {tab_id} has no origin that can be checked")
            }
            AuthError::OriginNotConnected(origin) => {
                write!(f, "Origin {origin} has not been connected")
            }
        }
    }
}

impl std::error::Error for AuthError {}
