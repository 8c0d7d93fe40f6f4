//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! User action:
//!     → router.rs (read active endpoint from BackendState)
//!     → timeouts.rs (deadline per attempt)
//!     → On failure: one retry against the other endpoint
//!     → On retry success: switch BackendState, emit notice
//!     → On double failure: error.rs AggregatedError
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retrying happens across endpoints, never against the same one
//! - Outage cost is bounded: Unavailable fails immediately without probing

pub mod error;
pub mod router;
pub mod timeouts;

pub use error::{AggregatedError, AttemptError, RouterError};
pub use router::ResilientRouter;
