//! Analysis subsystem.
//!
//! # Data Flow
//! ```text
//! Service side:
//!     document / clause
//!     → orchestrator.rs (input check, prompts.rs template)
//!     → TextGenerator (opaque model call)
//!     → normalizer.rs (fence strip, parse, shape check, tier derivation)
//!     → types.rs (AnalysisResult / CoachResult)
//!
//! Client side:
//!     service response body → normalizer.rs → types.rs
//! ```
//!
//! # Design Decisions
//! - Score is stored; tier and color are computed on every read
//! - Client and service share one normalizer so classification cannot drift

pub mod normalizer;
pub mod orchestrator;
pub mod prompts;
pub mod types;

pub use normalizer::{normalize, MalformedResponse};
pub use orchestrator::{AnalysisError, AnalysisOrchestrator};
pub use types::{AnalysisRequest, AnalysisResult, CoachResult, NormalizedResponse, Operation, RiskItem, RiskTier};
