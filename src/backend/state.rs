//! Active-backend state.
//!
//! # States
//! - Unknown: startup probes have not finished, submissions disabled
//! - PrimaryActive: requests target the primary instance
//! - SecondaryActive: requests target the secondary instance (degraded)
//! - Unavailable: neither instance answered the startup probes
//!
//! # State Transitions
//! ```text
//! Unknown → PrimaryActive | SecondaryActive | Unavailable   (selector, once)
//! PrimaryActive ↔ SecondaryActive                           (router, on fail-over)
//! Unavailable                                               terminal
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

use crate::backend::endpoint::EndpointRole;

/// Backend status enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Unknown = 0,
    PrimaryActive = 1,
    SecondaryActive = 2,
    Unavailable = 3,
}

impl From<u8> for BackendStatus {
    fn from(val: u8) -> Self {
        match val {
            1 => BackendStatus::PrimaryActive,
            2 => BackendStatus::SecondaryActive,
            3 => BackendStatus::Unavailable,
            _ => BackendStatus::Unknown,
        }
    }
}

impl BackendStatus {
    /// Status in which `role` is the active endpoint.
    pub fn active(role: EndpointRole) -> Self {
        match role {
            EndpointRole::Primary => BackendStatus::PrimaryActive,
            EndpointRole::Secondary => BackendStatus::SecondaryActive,
        }
    }
}

/// What a status indicator should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    /// Probing; the submit action stays disabled.
    Connecting,
    /// Primary instance in use.
    Primary,
    /// Secondary instance in use.
    Degraded,
    /// No instance reachable.
    Offline,
}

impl StatusIndicator {
    pub fn label(&self) -> &'static str {
        match self {
            StatusIndicator::Connecting => "Connecting",
            StatusIndicator::Primary => "Primary Backend",
            StatusIndicator::Degraded => "Fallback Backend",
            StatusIndicator::Offline => "Backend Offline",
        }
    }
}

/// Which endpoint is currently active.
///
/// Written by the selector at startup and by the router on fail-over;
/// requests are sequential per user action so writers never race.
#[derive(Debug)]
pub struct BackendState {
    status: AtomicU8,
}

impl BackendState {
    /// Create a state in `Unknown`.
    pub fn new() -> Self {
        Self {
            status: AtomicU8::new(BackendStatus::Unknown as u8),
        }
    }

    pub fn status(&self) -> BackendStatus {
        BackendStatus::from(self.status.load(Ordering::Acquire))
    }

    /// Role of the active endpoint, if one is active.
    pub fn active_role(&self) -> Option<EndpointRole> {
        match self.status() {
            BackendStatus::PrimaryActive => Some(EndpointRole::Primary),
            BackendStatus::SecondaryActive => Some(EndpointRole::Secondary),
            BackendStatus::Unknown | BackendStatus::Unavailable => None,
        }
    }

    /// True while the secondary endpoint is active.
    pub fn is_degraded(&self) -> bool {
        self.status() == BackendStatus::SecondaryActive
    }

    /// True once the startup probe round has finished.
    pub fn is_resolved(&self) -> bool {
        self.status() != BackendStatus::Unknown
    }

    pub fn indicator(&self) -> StatusIndicator {
        match self.status() {
            BackendStatus::Unknown => StatusIndicator::Connecting,
            BackendStatus::PrimaryActive => StatusIndicator::Primary,
            BackendStatus::SecondaryActive => StatusIndicator::Degraded,
            BackendStatus::Unavailable => StatusIndicator::Offline,
        }
    }

    /// Record the outcome of the startup probe round.
    pub(crate) fn resolve(&self, status: BackendStatus) {
        self.status.store(status as u8, Ordering::Release);
    }

    /// Make `role` active. Returns true when this changed the active endpoint.
    pub(crate) fn activate(&self, role: EndpointRole) -> bool {
        let next = BackendStatus::active(role) as u8;
        self.status.swap(next, Ordering::AcqRel) != next
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}
