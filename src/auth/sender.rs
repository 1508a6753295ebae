// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Classification of inbound message senders.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use super::permissions::{origin_of, OriginPermissions, TabTrustPolicy};
use super::AuthError;

/// Tab metadata attached by the browser transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Transport metadata for one inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    #[serde(default)]
    pub tab: Option<TabInfo>,
    /// Extension id of the sending context
    #[serde(default)]
    pub id: Option<String>,
    /// URL of the sending frame, when the tab URL is unavailable
    #[serde(default)]
    pub url: Option<String>,
}

impl MessageSender {
    /// Sender metadata for one of the wallet's own pages.
    pub fn internal(extension_id: impl Into<String>) -> Self {
        Self {
            tab: None,
            id: Some(extension_id.into()),
            url: None,
        }
    }

    /// Sender metadata for a web page in a tab.
    pub fn tab(tab_id: i32, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            tab: Some(TabInfo {
                id: Some(tab_id),
                url: Some(url.clone()),
            }),
            id: None,
            url: Some(url),
        }
    }
}

/// Verified identity of a sender, valid for a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderIdentity {
    /// One of the wallet's own contexts
    Internal,
    /// A web page
    Tab {
        tab_id: i32,
        origin: Option<String>,
    },
}

/// URL scheme of pages served from an extension package.
const EXTENSION_SCHEME: &str = "chrome-extension";

/// Decides whether a sender may reach the service routers.
#[derive(Debug, Clone)]
pub struct SenderAuthenticator {
    extension_id: String,
    policy: TabTrustPolicy,
    permissions: Arc<OriginPermissions>,
}

impl SenderAuthenticator {
    pub fn new(
        extension_id: impl Into<String>,
        policy: TabTrustPolicy,
        permissions: Arc<OriginPermissions>,
    ) -> Self {
        Self {
            extension_id: extension_id.into(),
            policy,
            permissions,
        }
    }

    pub fn permissions(&self) -> &Arc<OriginPermissions> {
        &self.permissions
    }

    fn is_own_id(&self, id: Option<&str>) -> bool {
        !self.extension_id.is_empty() && id == Some(self.extension_id.as_str())
    }

    /// Whether `url` is a page of this extension.
    fn is_own_page(&self, url: &str) -> bool {
        Url::parse(url.trim()).is_ok_and(|url| {
            url.scheme() == EXTENSION_SCHEME && self.is_own_id(url.host_str())
        })
    }

    /// Classify a sender. Pure; fails closed on missing identity.
    pub fn authenticate(&self, sender: &MessageSender) -> Result<SenderIdentity, AuthError> {
        if let Some(tab_id) = sender.tab.as_ref().and_then(|tab| tab.id) {
            let tab_url = sender
                .tab
                .as_ref()
                .and_then(|tab| tab.url.as_deref())
                .or(sender.url.as_deref());

            // Content scripts carry our id too, so the page itself must be ours.
            if self.is_own_id(sender.id.as_deref())
                && tab_url.is_some_and(|url| self.is_own_page(url))
            {
                return Ok(SenderIdentity::Internal);
            }

            let origin = tab_url.and_then(origin_of);

            return match self.policy {
                TabTrustPolicy::AnyTab => Ok(SenderIdentity::Tab { tab_id, origin }),
                TabTrustPolicy::ConnectedOrigins => {
                    let origin = origin.ok_or(AuthError::MissingOrigin { tab_id })?;
                    if self.permissions.is_connected(&origin) {
                        Ok(SenderIdentity::Tab {
                            tab_id,
                            origin: Some(origin),
                        })
                    } else {
                        Err(AuthError::OriginNotConnected(origin))
                    }
                }
            };
        }

        match sender.id.as_deref() {
            Some(id) if self.is_own_id(Some(id)) => Ok(SenderIdentity::Internal),
            Some(id) => Err(AuthError::ForeignExtension(id.to_string())),
            None => Err(AuthError::MissingIdentity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN_ID: &str = "walletextensionid";

    fn authenticator(policy: TabTrustPolicy) -> SenderAuthenticator {
        let perms = Arc::new(OriginPermissions::new());
        perms.grant("https://dex.example");
        SenderAuthenticator::new(OWN_ID, policy, perms)
    }

    #[test]
    fn own_extension_is_internal() {
        let auth = authenticator(TabTrustPolicy::ConnectedOrigins);
        assert_eq!(
            auth.authenticate(&MessageSender::internal(OWN_ID)),
            Ok(SenderIdentity::Internal)
        );
    }

    #[test]
    fn foreign_extension_is_rejected() {
        let auth = authenticator(TabTrustPolicy::AnyTab);
        assert_eq!(
            auth.authenticate(&MessageSender::internal("someoneelse")),
            Err(AuthError::ForeignExtension("someoneelse".into()))
        );
    }

    #[test]
    fn missing_identity_fails_closed() {
        let auth = authenticator(TabTrustPolicy::AnyTab);
        assert_eq!(
            auth.authenticate(&MessageSender::default()),
            Err(AuthError::MissingIdentity)
        );

        // A tab object without an id is not a tab.
        let sender = MessageSender {
            tab: Some(TabInfo {
                id: None,
                url: Some("https://dex.example".into()),
            }),
            ..Default::default()
        };
        assert_eq!(auth.authenticate(&sender), Err(AuthError::MissingIdentity));
    }

    #[test]
    fn any_tab_policy_trusts_every_tab() {
        let auth = authenticator(TabTrustPolicy::AnyTab);
        let identity = auth
            .authenticate(&MessageSender::tab(7, "https://unknown.example/page"))
            .unwrap();
        assert_eq!(
            identity,
            SenderIdentity::Tab {
                tab_id: 7,
                origin: Some("https://unknown.example".into())
            }
        );
    }

    #[test]
    fn connected_policy_checks_origin() {
        let auth = authenticator(TabTrustPolicy::ConnectedOrigins);
        assert!(auth
            .authenticate(&MessageSender::tab(1, "https://dex.example/swap"))
            .is_ok());
        assert_eq!(
            auth.authenticate(&MessageSender::tab(2, "https://evil.example/")),
            Err(AuthError::OriginNotConnected("https://evil.example".into()))
        );

        let no_url = MessageSender {
            tab: Some(TabInfo { id: Some(3), url: None }),
            ..Default::default()
        };
        assert_eq!(
            auth.authenticate(&no_url),
            Err(AuthError::MissingOrigin { tab_id: 3 })
        );
    }

    #[test]
    fn own_page_in_a_tab_is_internal() {
        let auth = authenticator(TabTrustPolicy::ConnectedOrigins);
        let own_page = MessageSender {
            id: Some(OWN_ID.into()),
            ..MessageSender::tab(12, "chrome-extension://walletextensionid/page.html")
        };
        assert_eq!(auth.authenticate(&own_page), Ok(SenderIdentity::Internal));
    }

    #[test]
    fn our_content_script_on_a_web_page_is_a_tab() {
        let auth = authenticator(TabTrustPolicy::ConnectedOrigins);
        let content_script = MessageSender {
            id: Some(OWN_ID.into()),
            ..MessageSender::tab(5, "https://evil.example/")
        };
        assert_eq!(
            auth.authenticate(&content_script),
            Err(AuthError::OriginNotConnected("https://evil.example".into()))
        );

        let connected = MessageSender {
            id: Some(OWN_ID.into()),
            ..MessageSender::tab(6, "https://dex.example/swap")
        };
        assert_eq!(
            auth.authenticate(&connected),
            Ok(SenderIdentity::Tab {
                tab_id: 6,
                origin: Some("https://dex.example".into())
            })
        );
    }

    #[test]
    fn extension_pages_need_both_our_id_and_our_host() {
        let auth = authenticator(TabTrustPolicy::ConnectedOrigins);

        let foreign_page = MessageSender {
            id: Some(OWN_ID.into()),
            ..MessageSender::tab(7, "chrome-extension://someoneelse/page.html")
        };
        assert!(auth.authenticate(&foreign_page).is_err());

        // Our URL without our id is another sender posing as us.
        let spoofed = MessageSender::tab(8, "chrome-extension://walletextensionid/page.html");
        assert_eq!(
            auth.authenticate(&spoofed),
            Err(AuthError::MissingOrigin { tab_id: 8 })
        );
    }

    #[test]
    fn empty_configured_id_matches_nothing() {
        let auth = SenderAuthenticator::new(
            "",
            TabTrustPolicy::ConnectedOrigins,
            Arc::new(OriginPermissions::new()),
        );
        assert!(auth.authenticate(&MessageSender::internal("")).is_err());
    }
}
