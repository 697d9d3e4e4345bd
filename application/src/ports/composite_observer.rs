//! Composite observer that delegates to multiple observers.
//!
//! Used to fan round events out to the console renderer, the progress bars,
//! and the JSONL transcript at the same time.

use super::observer::ConclaveObserver;
use conclave_domain::{AgentId, ConclaveEvent, RoundStage};
use std::sync::Arc;

/// An observer that delegates to multiple inner observers, in order.
///
/// ```text
///                      ConclaveEnvironment
///                              |
///                      CompositeObserver
///            +-----------------+------------------+
///            |                 |                  |
///     ProgressReporter   ConsoleReporter   JsonlEventLogger
/// ```
#[derive(Default)]
pub struct CompositeObserver {
    delegates: Vec<Arc<dyn ConclaveObserver>>,
}

impl CompositeObserver {
    pub fn new(delegates: Vec<Arc<dyn ConclaveObserver>>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, observer: Arc<dyn ConclaveObserver>) {
        self.delegates.push(observer);
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

/// Macro to delegate a method call to all inner observers.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl ConclaveObserver for CompositeObserver {
    fn on_fan_out_start(&self, stage: RoundStage, total: usize) {
        delegate!(self, on_fan_out_start, stage, total);
    }

    fn on_unit_complete(&self, stage: RoundStage, agent: AgentId, success: bool) {
        delegate!(self, on_unit_complete, stage, agent, success);
    }

    fn on_fan_out_complete(&self, stage: RoundStage) {
        delegate!(self, on_fan_out_complete, stage);
    }

    fn on_event(&self, event: &ConclaveEvent) {
        delegate!(self, on_event, event);
    }
}
