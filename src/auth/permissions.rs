// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-site permissions for browser tabs.

use std::collections::BTreeSet;
use std::sync::RwLock;

use url::Url;

/// How much trust a browser tab receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TabTrustPolicy {
    /// Only tabs whose origin was granted through the connect flow
    #[default]
    ConnectedOrigins,
    /// Any tab with an id
    AnyTab,
}

/// Serialized origin (`scheme://host[:port]`) of a URL.
///
/// Returns `None` for unparseable URLs and opaque origins (`data:`, `file:`).
pub fn origin_of(raw: &str) -> Option<String> {
    let origin = Url::parse(raw.trim()).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Set of origins the wallet owner has connected.
#[derive(Debug, Default)]
pub struct OriginPermissions {
    connected: RwLock<BTreeSet<String>>,
}

impl OriginPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant access to the origin of `url`. Returns the normalized origin.
    pub fn grant(&self, url: &str) -> Option<String> {
        let origin = origin_of(url)?;
        let mut connected = self.connected.write().unwrap_or_else(|e| e.into_inner());
        connected.insert(origin.clone());
        Some(origin)
    }

    /// Revoke access. Returns whether the origin had been connected.
    pub fn revoke(&self, url: &str) -> bool {
        let Some(origin) = origin_of(url) else {
            return false;
        };
        let mut connected = self.connected.write().unwrap_or_else(|e| e.into_inner());
        connected.remove(&origin)
    }

    pub fn is_connected(&self, origin: &str) -> bool {
        let connected = self.connected.read().unwrap_or_else(|e| e.into_inner());
        connected.contains(origin)
    }

    /// Connected origins in lexical order, for the settings screen.
    pub fn list(&self) -> Vec<String> {
        let connected = self.connected.read().unwrap_or_else(|e| e.into_inner());
        connected.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_strips_path_and_query() {
        assert_eq!(
            origin_of("https://app.example.com/send?x=1").as_deref(),
            Some("https://app.example.com")
        );
        assert_eq!(
            origin_of("http://localhost:5173/tx/abc").as_deref(),
            Some("http://localhost:5173")
        );
    }

    #[test]
    fn opaque_and_invalid_urls_have_no_origin() {
        assert!(origin_of("data:text/plain,hi").is_none());
        assert!(origin_of("not a url").is_none());
    }

    #[test]
    fn grant_and_revoke() {
        let perms = OriginPermissions::new();
        assert_eq!(
            perms.grant("https://dex.example/trade").as_deref(),
            Some("https://dex.example")
        );
        assert!(perms.is_connected("https://dex.example"));
        assert!(!perms.is_connected("https://evil.example"));
        assert_eq!(perms.list(), vec!["https://dex.example".to_string()]);

        assert!(perms.revoke("https://dex.example/"));
        assert!(!perms.revoke("https://dex.example/"));
        assert!(!perms.is_connected("https://dex.example"));
    }
}
