//! Startup backend selection.
//!
//! Probes the primary first and only touches the secondary when the primary
//! is unreachable. Runs once per session; later switches belong to the
//! router.

use std::sync::Arc;

use crate::backend::endpoint::{EndpointPair, EndpointRole};
use crate::backend::notice::{NoticeLevel, Notifier};
use crate::backend::state::{BackendState, BackendStatus};
use crate::health::HealthProber;

/// Resolves [`BackendState`] from its initial `Unknown`.
#[derive(Debug, Clone)]
pub struct BackendSelector {
    endpoints: Arc<EndpointPair>,
    prober: HealthProber,
    notifier: Notifier,
}

impl BackendSelector {
    pub fn new(endpoints: Arc<EndpointPair>, prober: HealthProber, notifier: Notifier) -> Self {
        Self {
            endpoints,
            prober,
            notifier,
        }
    }

    /// Run the startup probe round and record the outcome.
    ///
    /// A state that is already resolved is left untouched.
    pub async fn resolve(&self, state: &BackendState) -> BackendStatus {
        if state.is_resolved() {
            tracing::debug!(status = ?state.status(), "Backend state already resolved");
            return state.status();
        }

        let primary = self.endpoints.get(EndpointRole::Primary);
        let status = if self.prober.probe(primary).await {
            BackendStatus::PrimaryActive
        } else {
            tracing::warn!(endpoint = %primary, "Primary backend is down, trying secondary");
            let secondary = self.endpoints.get(EndpointRole::Secondary);
            if self.prober.probe(secondary).await {
                self.notifier.emit(
                    NoticeLevel::Warning,
                    format!("Using {} backend ({} is down)", secondary, primary.role),
                );
                BackendStatus::SecondaryActive
            } else {
                self.notifier
                    .emit(NoticeLevel::Error, "Backend services are unavailable");
                BackendStatus::Unavailable
            }
        };

        state.resolve(status);
        match state.active_role() {
            Some(role) => tracing::info!(endpoint = %self.endpoints.get(role), degraded = state.is_degraded(), "Backend selected"),
            None => tracing::error!("No backend available"),
        }
        status
    }
}
