//! Liveness probing.
//!
//! # Responsibilities
//! - Issue `GET <health path>` against one endpoint
//! - Report reachable/unreachable within a bounded timeout

use std::time::Duration;
use reqwest::Client;
use tokio::time;

use crate::backend::endpoint::ServiceEndpoint;
use crate::config::HealthCheckConfig;
use crate::observability::metrics;

/// Probes service endpoints for liveness.
#[derive(Debug, Clone)]
pub struct HealthProber {
    client: Client,
    path: String,
    timeout: Duration,
}

impl HealthProber {
    pub fn new(config: &HealthCheckConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("lexcompass-health-check")
            .build()?;

        Ok(Self {
            client,
            path: config.path.clone(),
            timeout,
        })
    }

    /// Any 2xx within the timeout counts as reachable.
    pub async fn probe(&self, endpoint: &ServiceEndpoint) -> bool {
        let url = endpoint.url_for(&self.path);
        let response_future = self.client.get(&url).send();

        let healthy = match time::timeout(self.timeout, response_future).await {
            Ok(Ok(response)) => {
                let success = response.status().is_success();
                if !success {
                    tracing::warn!(endpoint = %endpoint, status = %response.status(), "Health check failed: non-success status");
                }
                success
            },
            Ok(Err(e)) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "Health check failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(endpoint = %endpoint, timeout = ?self.timeout, "Health check failed: timeout");
                false
            },
        };

        if healthy {
            tracing::debug!(endpoint = %endpoint, "Health check passed");
        }
        metrics::record_backend_health(endpoint.role.as_str(), healthy);
        healthy
    }
}
