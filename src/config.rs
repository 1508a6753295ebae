// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used by
//! the background context. Configuration is read once at startup and passed
//! by value into the router, relay and pipeline.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `EXTENSION_ID` | The wallet's own extension identifier | Required |
//! | `TAB_TRUST_POLICY` | `connected` or `any` | `connected` |
//! | `REMOTE_CALL_TIMEOUT_SECS` | Per remote call bound in the pipeline, `0` disables | `120` |
//! | `RESPONSE_BUFFER` | Capacity of response channels | `64` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::time::Duration;

use crate::auth::TabTrustPolicy;
use crate::logging::LogFormat;

/// Environment variable holding the wallet's own extension identifier.
///
/// Messages whose sender carries this id are internal (popup, options page,
/// offscreen documents) and are always trusted.
pub const EXTENSION_ID_ENV: &str = "EXTENSION_ID";

pub const TAB_TRUST_POLICY_ENV: &str = "TAB_TRUST_POLICY";

pub const REMOTE_CALL_TIMEOUT_ENV: &str = "REMOTE_CALL_TIMEOUT_SECS";

pub const RESPONSE_BUFFER_ENV: &str = "RESPONSE_BUFFER";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_REMOTE_CALL_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_RESPONSE_BUFFER: usize = 64;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Router, relay and pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub extension_id: String,
    pub tab_trust: TabTrustPolicy,
    /// `None` disables the per-call bound.
    pub remote_call_timeout: Option<Duration>,
    pub response_buffer: usize,
    pub log_format: LogFormat,
}

impl RouterConfig {
    pub fn new(extension_id: impl Into<String>) -> Self {
        Self {
            extension_id: extension_id.into(),
            tab_trust: TabTrustPolicy::ConnectedOrigins,
            remote_call_timeout: Some(DEFAULT_REMOTE_CALL_TIMEOUT),
            response_buffer: DEFAULT_RESPONSE_BUFFER,
            log_format: LogFormat::Pretty,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let extension_id = lookup(EXTENSION_ID_ENV)
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::Missing(EXTENSION_ID_ENV))?;
        let mut config = Self::new(extension_id.trim());

        if let Some(raw) = lookup(TAB_TRUST_POLICY_ENV) {
            config.tab_trust = match raw.trim().to_ascii_lowercase().as_str() {
                "connected" => TabTrustPolicy::ConnectedOrigins,
                "any" => TabTrustPolicy::AnyTab,
                _ => return Err(invalid(TAB_TRUST_POLICY_ENV, raw)),
            };
        }

        if let Some(raw) = lookup(REMOTE_CALL_TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid(REMOTE_CALL_TIMEOUT_ENV, raw.clone()))?;
            config.remote_call_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(RESPONSE_BUFFER_ENV) {
            config.response_buffer = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid(RESPONSE_BUFFER_ENV, raw.clone()))?;
        }

        if let Some(raw) = lookup(LOG_FORMAT_ENV) {
            config.log_format = match raw.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => return Err(invalid(LOG_FORMAT_ENV, raw)),
            };
        }

        Ok(config)
    }
}

fn invalid(name: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { name, value }
}
