//! Backend selection subsystem.
//!
//! # Data Flow
//! ```text
//! Client start
//!     → selector.rs (probe primary, then secondary)
//!     → state.rs (Unknown → PrimaryActive | SecondaryActive | Unavailable)
//!
//! Live request failure (resilience/router.rs)
//!     → state.rs (switch to the endpoint that answered)
//!     → notice.rs (tell the user)
//!
//! Optional: failback.rs re-probes the primary while degraded
//! ```
//!
//! # Design Decisions
//! - Exactly two endpoints, fixed at configuration time
//! - No background traffic by default; switches are driven by live requests
//! - Unavailable is terminal for the session

pub mod endpoint;
pub mod failback;
pub mod notice;
pub mod selector;
pub mod state;

pub use endpoint::{EndpointPair, EndpointRole, ServiceEndpoint};
pub use failback::FailbackMonitor;
pub use notice::{Notice, NoticeLevel, Notifier};
pub use selector::BackendSelector;
pub use state::{BackendState, BackendStatus, StatusIndicator};
