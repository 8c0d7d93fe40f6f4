//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check both endpoints are usable, distinct http(s) URLs
//! - Validate value ranges (timeouts > 0, sampling parameters in range)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LexConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::LexConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &LexConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let primary = check_endpoint("endpoints.primary", &config.endpoints.primary, &mut errors);
    let secondary = check_endpoint("endpoints.secondary", &config.endpoints.secondary, &mut errors);
    if let (Some(p), Some(s)) = (primary, secondary) {
        if p == s {
            errors.push(ValidationError::new(
                "endpoints.secondary",
                "must differ from endpoints.primary",
            ));
        }
    }

    for (field, value) in [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.probe_secs", config.timeouts.probe_secs),
        ("timeouts.server_request_secs", config.timeouts.server_request_secs),
        ("generation.timeout_secs", config.generation.timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::new("health_check.path", "must start with '/'"));
    }

    let generation = &config.generation;
    if !(0.0..=2.0).contains(&generation.temperature) {
        errors.push(ValidationError::new("generation.temperature", "must be within [0, 2]"));
    }
    if !(generation.top_p > 0.0 && generation.top_p <= 1.0) {
        errors.push(ValidationError::new("generation.top_p", "must be within (0, 1]"));
    }
    if generation.max_output_tokens == 0 {
        errors.push(ValidationError::new(
            "generation.max_output_tokens",
            "must be greater than zero",
        ));
    }
    if generation.model.trim().is_empty() {
        errors.push(ValidationError::new("generation.model", "must not be empty"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(field: &str, raw: &str, errors: &mut Vec<ValidationError>) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(url) => {
            errors.push(ValidationError::new(
                field,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
            None
        }
        Err(e) => {
            errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", raw, e)));
            None
        }
    }
}
