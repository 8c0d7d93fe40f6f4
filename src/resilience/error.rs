//! Request-layer error taxonomy.

use std::time::Duration;
use thiserror::Error;

use crate::analysis::MalformedResponse;
use crate::backend::EndpointRole;

/// Why a single attempt against one endpoint failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// Connection, TLS, or body transfer failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// No complete response within the attempt deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The instance answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The instance did not answer the startup probes.
    #[error("unreachable at startup")]
    Unreachable,
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        AttemptError::Transport(e.to_string())
    }
}

/// Both endpoints failed for one request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("All backend services are unavailable. Please try again later. ({first_role}: {first}; {second_role}: {second})")]
pub struct AggregatedError {
    pub first_role: EndpointRole,
    pub first: AttemptError,
    pub second_role: EndpointRole,
    pub second: AttemptError,
}

impl AggregatedError {
    /// The reason recorded for `role`.
    pub fn reason_for(&self, role: EndpointRole) -> &AttemptError {
        if self.first_role == role {
            &self.first
        } else {
            &self.second
        }
    }
}

/// Everything a routed request can fail with.
#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// Startup probing has not finished; submission stays disabled.
    #[error("backend selection has not finished yet")]
    NotReady,

    /// Nothing to send; rejected before any network call.
    #[error("{0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Aggregated(#[from] AggregatedError),

    /// A 2xx body that does not normalize. Not retried elsewhere.
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
}
