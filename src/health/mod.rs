//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (backend/selector.rs):
//!     Probe primary → probe secondary if needed
//!     → resolve BackendState
//!
//! Optional fail-back (backend/failback.rs):
//!     Periodic timer while degraded
//!     → probe primary
//! ```
//!
//! # Design Decisions
//! - Probes never run inline with a user request; the router's own
//!   failure-driven switch covers that path
//! - A probe that exceeds its timeout is a failure, not a pending result

pub mod probe;

pub use probe::HealthProber;
