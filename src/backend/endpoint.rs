//! Service endpoint identities.

use std::fmt;
use url::Url;

use crate::config::EndpointsConfig;

/// Which of the two configured instances an endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointRole {
    Primary,
    Secondary,
}

impl EndpointRole {
    /// The opposite role.
    pub fn other(self) -> Self {
        match self {
            EndpointRole::Primary => EndpointRole::Secondary,
            EndpointRole::Secondary => EndpointRole::Primary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointRole::Primary => "primary",
            EndpointRole::Secondary => "secondary",
        }
    }
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single service instance. Immutable after configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub role: EndpointRole,
    pub base_url: Url,
}

impl ServiceEndpoint {
    pub fn new(role: EndpointRole, base_url: Url) -> Self {
        Self { role, base_url }
    }

    /// Absolute URL for a path on this instance.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.role, self.base_url.as_str().trim_end_matches('/'))
    }
}

/// The primary/secondary pair the client chooses between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPair {
    primary: ServiceEndpoint,
    secondary: ServiceEndpoint,
}

impl EndpointPair {
    pub fn new(primary: Url, secondary: Url) -> Self {
        Self {
            primary: ServiceEndpoint::new(EndpointRole::Primary, primary),
            secondary: ServiceEndpoint::new(EndpointRole::Secondary, secondary),
        }
    }

    /// Build from configuration.
    pub fn from_config(config: &EndpointsConfig) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(&config.primary)?, Url::parse(&config.secondary)?))
    }

    pub fn get(&self, role: EndpointRole) -> &ServiceEndpoint {
        match role {
            EndpointRole::Primary => &self.primary,
            EndpointRole::Secondary => &self.secondary,
        }
    }

    pub fn primary(&self) -> &ServiceEndpoint {
        &self.primary
    }

    pub fn secondary(&self) -> &ServiceEndpoint {
        &self.secondary
    }
}
