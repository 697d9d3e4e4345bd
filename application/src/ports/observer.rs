//! Round observer port
//!
//! Defines the interface for reporting fan-out progress and round events.
//! Console rendering, progress bars, and transcripts are all observers; the
//! environment itself never prints.

use conclave_domain::{AgentId, ConclaveEvent, RoundStage};

/// Callback for progress updates and round events
///
/// Implementations live in the presentation and infrastructure layers.
/// Every method has a no-op default so observers implement only what they
/// render.
pub trait ConclaveObserver: Send + Sync {
    /// Called when a fan-out starts
    fn on_fan_out_start(&self, _stage: RoundStage, _total: usize) {}

    /// Called as each unit of a fan-out resolves
    fn on_unit_complete(&self, _stage: RoundStage, _agent: AgentId, _success: bool) {}

    /// Called after the fan-out's join point
    fn on_fan_out_complete(&self, _stage: RoundStage) {}

    /// Called for every structured round event
    fn on_event(&self, _event: &ConclaveEvent) {}
}

/// No-op observer for when nothing needs to be reported
pub struct NoObserver;

impl ConclaveObserver for NoObserver {}
