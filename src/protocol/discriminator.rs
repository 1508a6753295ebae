// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request discriminators and the service type registry.

use std::collections::HashMap;
use std::fmt;

/// Wallet-internal control messages.
pub const STD_SERVICE: &str = "penumbra.extension.v1alpha1.StdService";
pub const VIEW_SERVICE: &str = "penumbra.view.v1alpha1.ViewProtocolService";
pub const CUSTODY_SERVICE: &str = "penumbra.custody.v1alpha1.CustodyProtocolService";
pub const IBC_CLIENT_SERVICE: &str = "ibc.core.client.v1.Query";

/// Logical protocol family a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceFamily {
    Std,
    View,
    Custody,
    IbcClient,
}

impl ServiceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceFamily::Std => "std",
            ServiceFamily::View => "view",
            ServiceFamily::Custody => "custody",
            ServiceFamily::IbcClient => "ibc_client",
        }
    }
}

impl fmt::Display for ServiceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<service>.<method>` type tag of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Discriminator {
    pub service: String,
    pub method: String,
}

impl Discriminator {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
        }
    }

    /// Split a type tag on its last `.`. Both halves must be non-empty and
    /// free of whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let (service, method) = raw.rsplit_once('.')?;
        let well_formed = |part: &str| !part.is_empty() && !part.chars().any(char::is_whitespace);
        if !well_formed(service) || !well_formed(method) {
            return None;
        }
        Some(Self::new(service, method))
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.method)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("service {service} is already registered as {existing}")]
    Duplicate {
        service: String,
        existing: ServiceFamily,
    },
}

/// Immutable mapping from service name to family, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    services: HashMap<String, ServiceFamily>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four services the background context serves.
    pub fn standard() -> Self {
        let services = [
            (STD_SERVICE, ServiceFamily::Std),
            (VIEW_SERVICE, ServiceFamily::View),
            (CUSTODY_SERVICE, ServiceFamily::Custody),
            (IBC_CLIENT_SERVICE, ServiceFamily::IbcClient),
        ]
        .into_iter()
        .map(|(name, family)| (name.to_string(), family))
        .collect();
        Self { services }
    }

    /// Add a service. A service name maps to at most one family.
    pub fn register(
        mut self,
        service: impl Into<String>,
        family: ServiceFamily,
    ) -> Result<Self, RegistryError> {
        let service = service.into();
        if let Some(existing) = self.services.get(&service) {
            return Err(RegistryError::Duplicate {
                service,
                existing: *existing,
            });
        }
        self.services.insert(service, family);
        Ok(self)
    }

    /// Family of a discriminator; depends on the service name only.
    pub fn classify(&self, discriminator: &Discriminator) -> Option<ServiceFamily> {
        self.services.get(&discriminator.service).copied()
    }

    pub fn is_std_request(&self, discriminator: &Discriminator) -> bool {
        self.classify(discriminator) == Some(ServiceFamily::Std)
    }

    pub fn is_view_server_request(&self, discriminator: &Discriminator) -> bool {
        self.classify(discriminator) == Some(ServiceFamily::View)
    }

    pub fn is_custody_server_request(&self, discriminator: &Discriminator) -> bool {
        self.classify(discriminator) == Some(ServiceFamily::Custody)
    }

    pub fn is_ibc_client_server_request(&self, discriminator: &Discriminator) -> bool {
        self.classify(discriminator) == Some(ServiceFamily::IbcClient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_last_dot() {
        let d = Discriminator::parse("penumbra.view.v1alpha1.ViewProtocolService.Assets").unwrap();
        assert_eq!(d.service, VIEW_SERVICE);
        assert_eq!(d.method, "Assets");
        assert_eq!(d.to_string(), "penumbra.view.v1alpha1.ViewProtocolService.Assets");
    }

    #[test]
    fn parse_rejects_malformed_tags() {
        assert!(Discriminator::parse("NoDot").is_none());
        assert!(Discriminator::parse("service.").is_none());
        assert!(Discriminator::parse(".Method").is_none());
        assert!(Discriminator::parse("svc.Bad Method").is_none());
    }

    #[test]
    fn families_are_mutually_exclusive() {
        let registry = TypeRegistry::standard();
        for service in [STD_SERVICE, VIEW_SERVICE, CUSTODY_SERVICE, IBC_CLIENT_SERVICE] {
            let d = Discriminator::new(service, "Anything");
            let hits = [
                registry.is_std_request(&d),
                registry.is_view_server_request(&d),
                registry.is_custody_server_request(&d),
                registry.is_ibc_client_server_request(&d),
            ];
            assert_eq!(hits.iter().filter(|hit| **hit).count(), 1, "{service}");
        }
    }

    #[test]
    fn unknown_service_is_unclassified() {
        let registry = TypeRegistry::standard();
        let d = Discriminator::new("penumbra.dex.v1alpha1.SimulationService", "SimulateTrade");
        assert_eq!(registry.classify(&d), None);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let err = TypeRegistry::standard()
            .register(VIEW_SERVICE, ServiceFamily::Custody)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                service: VIEW_SERVICE.to_string(),
                existing: ServiceFamily::View
            }
        );

        let registry = TypeRegistry::new()
            .register("x.Svc", ServiceFamily::Std)
            .unwrap();
        assert!(registry.is_std_request(&Discriminator::new("x.Svc", "Ping")));
    }
}
