//! Optional background fail-back.
//!
//! # Responsibilities
//! - While the secondary is active, periodically probe the primary
//! - Switch back to the primary when it answers
//!
//! Disabled unless `failback.reprobe_interval_secs` is non-zero. Without it
//! the client only returns to the primary when a live request against it
//! succeeds. `Unavailable` is never left.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::backend::endpoint::{EndpointPair, EndpointRole};
use crate::backend::notice::{NoticeLevel, Notifier};
use crate::backend::state::BackendState;
use crate::health::HealthProber;
use crate::observability::metrics;

pub struct FailbackMonitor {
    endpoints: Arc<EndpointPair>,
    state: Arc<BackendState>,
    prober: HealthProber,
    notifier: Notifier,
    interval: Duration,
}

impl FailbackMonitor {
    pub fn new(
        endpoints: Arc<EndpointPair>,
        state: Arc<BackendState>,
        prober: HealthProber,
        notifier: Notifier,
        interval: Duration,
    ) -> Self {
        Self {
            endpoints,
            state,
            prober,
            notifier,
            interval,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if self.interval.is_zero() {
            tracing::info!("Fail-back re-probe disabled");
            return;
        }

        tracing::info!(interval = ?self.interval, "Fail-back monitor starting");

        let mut ticker = time::interval(self.interval);
        // The first tick fires immediately; startup probing already covered it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Fail-back monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe the primary if degraded. Returns true when it switched back.
    pub async fn check_once(&self) -> bool {
        if !self.state.is_degraded() {
            return false;
        }

        let primary = self.endpoints.get(EndpointRole::Primary);
        if !self.prober.probe(primary).await {
            return false;
        }

        // A live request may have switched already while the probe was out.
        if !self.state.is_degraded() || !self.state.activate(EndpointRole::Primary) {
            return false;
        }

        metrics::record_failover(EndpointRole::Primary.as_str());
        self.notifier
            .emit(NoticeLevel::Info, format!("Switched to {} backend", primary));
        true
    }
}
