//! LexCompass: contract analysis service and resilient client.

// Service side
pub mod analysis;
pub mod http;
pub mod provider;

// Client side
pub mod backend;
pub mod client;
pub mod health;
pub mod resilience;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use analysis::AnalysisOrchestrator;
pub use client::LexClient;
pub use config::LexConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
