//! Client facade.
//!
//! # Responsibilities
//! - Own the backend state, selector, router and notice channel for a session
//! - Expose typed analyze/coach calls and the status indicator to the UI layer
//!
//! # Data Flow
//! ```text
//! initialize() → BackendSelector → BackendState resolved
//! analyze()/coach() → ResilientRouter → normalized result
//! ```

pub mod report;

pub use report::{AnalysisReport, ReportRisk};

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::analysis::{AnalysisRequest, AnalysisResult, CoachResult, MalformedResponse, NormalizedResponse, Operation};
use crate::backend::{
    BackendSelector, BackendState, BackendStatus, EndpointPair, FailbackMonitor, Notice, Notifier,
    ServiceEndpoint, StatusIndicator,
};
use crate::config::LexConfig;
use crate::health::HealthProber;
use crate::resilience::{ResilientRouter, RouterError};

/// Errors building a client from configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// One client session against the primary/secondary service pair.
pub struct LexClient {
    endpoints: Arc<EndpointPair>,
    state: Arc<BackendState>,
    notifier: Notifier,
    prober: HealthProber,
    selector: BackendSelector,
    router: ResilientRouter,
    reprobe_interval: Duration,
}

impl LexClient {
    pub fn from_config(config: &LexConfig) -> Result<Self, ClientError> {
        let endpoints = Arc::new(EndpointPair::from_config(&config.endpoints)?);
        let state = Arc::new(BackendState::new());
        let notifier = Notifier::default();

        let prober = HealthProber::new(
            &config.health_check,
            Duration::from_secs(config.timeouts.probe_secs),
        )?;
        let selector = BackendSelector::new(endpoints.clone(), prober.clone(), notifier.clone());
        let router = ResilientRouter::new(
            reqwest::Client::builder().build()?,
            endpoints.clone(),
            state.clone(),
            notifier.clone(),
            Duration::from_secs(config.timeouts.request_secs),
        );

        Ok(Self {
            endpoints,
            state,
            notifier,
            prober,
            selector,
            router,
            reprobe_interval: Duration::from_secs(config.failback.reprobe_interval_secs),
        })
    }

    /// Run the startup probe round. Submissions are refused until it returns.
    pub async fn initialize(&self) -> BackendStatus {
        self.selector.resolve(&self.state).await
    }

    /// Start the background fail-back monitor if one is configured.
    pub fn spawn_failback(&self, shutdown: broadcast::Receiver<()>) -> Option<JoinHandle<()>> {
        if self.reprobe_interval.is_zero() {
            return None;
        }
        let monitor = self.failback_monitor();
        Some(tokio::spawn(async move {
            monitor.run(shutdown).await;
        }))
    }

    /// A fail-back monitor bound to this session's state.
    pub fn failback_monitor(&self) -> FailbackMonitor {
        FailbackMonitor::new(
            self.endpoints.clone(),
            self.state.clone(),
            self.prober.clone(),
            self.notifier.clone(),
            self.reprobe_interval,
        )
    }

    /// Analyze a document.
    pub async fn analyze(&self, document: Vec<u8>, file_name: &str) -> Result<AnalysisResult, RouterError> {
        let request = AnalysisRequest::Analyze {
            document,
            file_name: file_name.to_string(),
        };
        match self.router.send(&request).await? {
            NormalizedResponse::Analysis(result) => Ok(result),
            other => Err(mismatch(Operation::Analyze, other)),
        }
    }

    /// Ask for a safer rewrite of a clause.
    pub async fn coach(&self, clause: &str) -> Result<CoachResult, RouterError> {
        let request = AnalysisRequest::Coach {
            clause: clause.to_string(),
        };
        match self.router.send(&request).await? {
            NormalizedResponse::Coach(result) => Ok(result),
            other => Err(mismatch(Operation::Coach, other)),
        }
    }

    pub fn status(&self) -> StatusIndicator {
        self.state.indicator()
    }

    pub fn backend_status(&self) -> BackendStatus {
        self.state.status()
    }

    /// Whether the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        self.state.active_role().is_some()
    }

    pub fn active_endpoint(&self) -> Option<&ServiceEndpoint> {
        self.state.active_role().map(|role| self.endpoints.get(role))
    }

    pub fn endpoints(&self) -> &EndpointPair {
        &self.endpoints
    }

    pub fn state(&self) -> Arc<BackendState> {
        self.state.clone()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notifier.subscribe()
    }
}

fn mismatch(expected: Operation, got: NormalizedResponse) -> RouterError {
    RouterError::Malformed(MalformedResponse {
        operation: expected,
        reason: format!("received a {} response", got.operation()),
        raw: String::new(),
    })
}
