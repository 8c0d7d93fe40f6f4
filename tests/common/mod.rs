//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use lexcompass::config::LexConfig;
use lexcompass::provider::{ProviderError, SamplingConfig, TextGenerator};

pub const ANALYSIS_BODY: &str = r#"{"decisionMap":["Rent is due on the 1st"],"riskRadar":[{"clause":"Late fees double after 5 days.","risk":"Costly penalty.","riskScore":8}]}"#;
pub const COACH_BODY: &str = r#"{"suggestion":"Late fees may not exceed 5%.","explanation":"Caps the penalty."}"#;

/// Programmable stand-in for one analysis service instance.
///
/// Starts healthy and answering 200 on every route.
pub struct MockService {
    pub healthy: AtomicBool,
    pub status: AtomicU16,
    pub calls: AtomicU32,
    pub delay_ms: AtomicU64,
    pub body: Mutex<Option<String>>,
}

impl MockService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            healthy: AtomicBool::new(true),
            status: AtomicU16::new(200),
            calls: AtomicU32::new(0),
            delay_ms: AtomicU64::new(0),
            body: Mutex::new(None),
        })
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Status returned by `/analyze` and `/coach`.
    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    /// Hold `/analyze` and `/coach` responses for `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Replace the canned success body.
    pub fn set_body(&self, body: &str) {
        *self.body.lock().unwrap() = Some(body.to_string());
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn reply(&self, body: &'static str) -> Response {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let body = self.body.lock().unwrap().clone().unwrap_or_else(|| body.to_string());
        let status = StatusCode::from_u16(self.status.load(Ordering::SeqCst))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_success() {
            (
                status,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        } else {
            (status, Json(json!({ "error": "mock failure" }))).into_response()
        }
    }
}

/// Start `service` on an ephemeral local port.
pub async fn start_mock_service(service: Arc<MockService>) -> SocketAddr {
    let app = Router::new()
        .route(
            "/health",
            get(|State(s): State<Arc<MockService>>| async move {
                if s.healthy.load(Ordering::SeqCst) {
                    (StatusCode::OK, Json(json!({ "status": "ok" })))
                } else {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "down" })))
                }
            }),
        )
        .route(
            "/analyze",
            post(|State(s): State<Arc<MockService>>| async move { s.reply(ANALYSIS_BODY).await }),
        )
        .route(
            "/coach",
            post(|State(s): State<Arc<MockService>>| async move { s.reply(COACH_BODY).await }),
        )
        .with_state(service);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A local address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Client configuration pointing at two local addresses with short timeouts.
pub fn client_config(primary: SocketAddr, secondary: SocketAddr) -> LexConfig {
    let mut config = LexConfig::default();
    config.endpoints.primary = format!("http://{}", primary);
    config.endpoints.secondary = format!("http://{}", secondary);
    config.timeouts.request_secs = 2;
    config.timeouts.probe_secs = 1;
    config
}

/// Text generator that replays a fixed reply and counts calls.
pub struct StubGenerator {
    pub reply: Result<String, String>,
    pub calls: AtomicU32,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicU32::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn generate(&self, _prompt: &str, _sampling: &SamplingConfig) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(ProviderError::Provider)
    }
}
