//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure shared by the
//! analysis service and the client. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for lexcompass.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LexConfig {
    /// Listener configuration for the analysis service.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// The two interchangeable service instances the client may reach.
    pub endpoints: EndpointsConfig,

    /// Liveness probe settings.
    pub health_check: HealthCheckConfig,

    /// Fail-back policy.
    pub failback: FailbackConfig,

    /// Text-generation collaborator settings.
    pub generation: GenerationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-attempt timeout for a client request, in seconds.
    pub request_secs: u64,

    /// Liveness probe timeout, in seconds.
    pub probe_secs: u64,

    /// Service-side ceiling for handling one request, in seconds.
    pub server_request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 10,
            probe_secs: 5,
            server_request_secs: 120,
        }
    }
}

/// Service instance URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Preferred remote instance.
    pub primary: String,

    /// Local fallback instance.
    pub secondary: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            primary: "https://lexcompass.onrender.com".to_string(),
            secondary: "http://localhost:3000".to_string(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Path to probe on each instance.
    pub path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
        }
    }
}

/// Fail-back configuration.
///
/// With the default interval of zero the client only returns to the primary
/// instance when a live request against it succeeds.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailbackConfig {
    /// Interval between background re-probes of the primary while degraded.
    /// Zero disables the re-probe.
    pub reprobe_interval_secs: u64,
}

/// Text-generation collaborator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the Generative Language API.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Sampling temperature. Low values keep the output parseable.
    pub temperature: f32,

    /// Maximum number of output tokens.
    pub max_output_tokens: u32,

    /// Nucleus sampling parameter.
    pub top_p: f32,

    /// Top-k sampling parameter.
    pub top_k: u32,

    /// Timeout for one generation call, in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            temperature: 0.2,
            max_output_tokens: 1000,
            top_p: 0.8,
            top_k: 40,
            timeout_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = LexConfig::default();
        assert_eq!(config.timeouts.request_secs, 10);
        assert_eq!(config.timeouts.probe_secs, 5);
        assert_eq!(config.endpoints.secondary, "http://localhost:3000");
        assert_eq!(config.failback.reprobe_interval_secs, 0);
        assert_eq!(config.generation.max_output_tokens, 1000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: LexConfig = toml::from_str(
            r#"
            [endpoints]
            primary = "http://10.0.0.5:3000"

            [generation]
            temperature = 0.1
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoints.primary, "http://10.0.0.5:3000");
        assert_eq!(config.endpoints.secondary, "http://localhost:3000");
        assert_eq!(config.generation.temperature, 0.1);
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }
}
