//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LexConfig (validated, immutable)
//!     → cloned into the service and client subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Service and client read the same file; each uses its own sections

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::LexConfig;
pub use schema::{
    EndpointsConfig, FailbackConfig, GenerationConfig, HealthCheckConfig, ListenerConfig,
    ObservabilityConfig, SecurityConfig, TimeoutConfig,
};
