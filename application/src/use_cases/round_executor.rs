//! Bounded concurrent fan-out of elector decisions
//!
//! Every round stage (urgency collection, discussion, voting) asks a set of
//! electors for an independent decision. [`RoundExecutor`] runs those units
//! on a [`JoinSet`] with at most `min(worker_cap, units)` in flight, collects
//! results in completion order, and only returns once every unit has
//! resolved.

use crate::ports::elector_agent::DecisionError;
use crate::ports::observer::ConclaveObserver;
use conclave_domain::{AgentId, RoundStage};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// A unit that did not produce a result
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFailure {
    pub agent: AgentId,
    pub error: DecisionError,
}

/// Result of one fan-out, in completion order
#[derive(Debug)]
pub struct FanOut<T> {
    pub successes: Vec<(AgentId, T)>,
    pub failures: Vec<UnitFailure>,
}

impl<T> Default for FanOut<T> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> FanOut<T> {
    /// First failure that makes further decisions impossible
    pub fn fatal(&self) -> Option<&UnitFailure> {
        self.failures.iter().find(|f| f.error.is_fatal())
    }

    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs a batch of decision futures with bounded parallelism
#[derive(Debug, Clone)]
pub struct RoundExecutor {
    worker_cap: usize,
    unit_timeout: Option<Duration>,
}

impl RoundExecutor {
    /// `worker_cap` is clamped to at least 1
    pub fn new(worker_cap: usize) -> Self {
        Self {
            worker_cap: worker_cap.max(1),
            unit_timeout: None,
        }
    }

    pub fn with_unit_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.unit_timeout = timeout;
        self
    }

    pub fn worker_cap(&self) -> usize {
        self.worker_cap
    }

    /// Number of units allowed in flight for a batch of `units`
    pub fn width(&self, units: usize) -> usize {
        self.worker_cap.min(units)
    }

    /// Run every unit to completion
    ///
    /// A failing, timed-out, or panicking unit is recorded in
    /// [`FanOut::failures`] and never cancels its siblings.
    pub async fn fan_out<T, Fut>(
        &self,
        stage: RoundStage,
        units: Vec<(AgentId, Fut)>,
        observer: &dyn ConclaveObserver,
    ) -> FanOut<T>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, DecisionError>> + Send + 'static,
    {
        let total = units.len();
        observer.on_fan_out_start(stage, total);

        let mut report = FanOut::default();
        if total == 0 {
            observer.on_fan_out_complete(stage);
            return report;
        }

        let width = self.width(total);
        debug!("{}: {} units, {} in flight", stage.as_str(), total, width);

        let permits = Arc::new(Semaphore::new(width));
        let mut join_set = JoinSet::new();
        let mut owners = HashMap::with_capacity(total);

        for (agent, unit) in units {
            let permits = Arc::clone(&permits);
            let limit = self.unit_timeout;

            let handle = join_set.spawn(async move {
                // The semaphore is never closed, so acquisition cannot fail.
                let _permit = permits.acquire_owned().await.ok();
                let result = match limit {
                    Some(limit) => tokio::time::timeout(limit, unit)
                        .await
                        .unwrap_or(Err(DecisionError::Timeout(limit))),
                    None => unit.await,
                };
                (agent, result)
            });
            owners.insert(handle.id(), agent);
        }

        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, (agent, Ok(value)))) => {
                    observer.on_unit_complete(stage, agent, true);
                    report.successes.push((agent, value));
                }
                Ok((_, (agent, Err(error)))) => {
                    warn!("{} failed for elector {}: {}", stage.as_str(), agent, error);
                    observer.on_unit_complete(stage, agent, false);
                    report.failures.push(UnitFailure { agent, error });
                }
                Err(join_error) => {
                    let Some(&agent) = owners.get(&join_error.id()) else {
                        warn!("Task join error: {}", join_error);
                        continue;
                    };
                    warn!("{} task for elector {} aborted: {}", stage.as_str(), agent, join_error);
                    observer.on_unit_complete(stage, agent, false);
                    report.failures.push(UnitFailure {
                        agent,
                        error: DecisionError::Panicked(join_error.to_string()),
                    });
                }
            }
        }

        observer.on_fan_out_complete(stage);
        report
    }
}

impl Default for RoundExecutor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_WORKER_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::observer::NoObserver;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Unit = std::pin::Pin<Box<dyn Future<Output = Result<usize, DecisionError>> + Send>>;

    fn unit<F>(future: F) -> Unit
    where
        F: Future<Output = Result<usize, DecisionError>> + Send + 'static,
    {
        Box::pin(future)
    }

    #[derive(Default)]
    struct CountingObserver {
        started: Mutex<Vec<(RoundStage, usize)>>,
        completed: Mutex<Vec<(AgentId, bool)>>,
        finished: AtomicUsize,
    }

    impl ConclaveObserver for CountingObserver {
        fn on_fan_out_start(&self, stage: RoundStage, total: usize) {
            self.started.lock().unwrap().push((stage, total));
        }

        fn on_unit_complete(&self, _stage: RoundStage, agent: AgentId, success: bool) {
            self.completed.lock().unwrap().push((agent, success));
        }

        fn on_fan_out_complete(&self, _stage: RoundStage) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_worker_cap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let units: Vec<(AgentId, Unit)> = (0..12)
            .map(|i| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                let work = unit(async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(i)
                });
                (AgentId::new(i), work)
            })
            .collect();

        let report = RoundExecutor::new(3)
            .fan_out(RoundStage::Voting, units, &NoObserver)
            .await;

        assert_eq!(report.successes.len(), 12);
        assert!(report.failures.is_empty());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let units: Vec<(AgentId, Unit)> = vec![
            (AgentId::new(0), unit(async { Ok(0) })),
            (
                AgentId::new(1),
                unit(async { Err(DecisionError::Gateway("502".into())) }),
            ),
            (AgentId::new(2), unit(async { Ok(2) })),
        ];
        let observer = CountingObserver::default();

        let report = RoundExecutor::new(8)
            .fan_out(RoundStage::Voting, units, &observer)
            .await;

        let mut ok: Vec<_> = report.successes.iter().map(|(a, _)| a.index()).collect();
        ok.sort_unstable();
        assert_eq!(ok, vec![0, 2]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].agent, AgentId::new(1));
        assert!(report.fatal().is_none());

        assert_eq!(*observer.started.lock().unwrap(), vec![(RoundStage::Voting, 3)]);
        assert_eq!(observer.completed.lock().unwrap().len(), 3);
        assert_eq!(observer.finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_unit_becomes_failure() {
        let units: Vec<(AgentId, Unit)> = vec![
            (AgentId::new(0), unit(async { panic!("elector crashed") })),
            (AgentId::new(1), unit(async { Ok(1) })),
        ];

        let report = RoundExecutor::new(2)
            .fan_out(RoundStage::Discussion, units, &NoObserver)
            .await;

        assert_eq!(report.successes, vec![(AgentId::new(1), 1)]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].agent, AgentId::new(0));
        assert!(matches!(report.failures[0].error, DecisionError::Panicked(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unit_timeout() {
        let units: Vec<(AgentId, Unit)> = vec![
            (
                AgentId::new(0),
                unit(async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(0)
                }),
            ),
            (AgentId::new(1), unit(async { Ok(1) })),
        ];

        let report = RoundExecutor::new(2)
            .with_unit_timeout(Some(Duration::from_secs(5)))
            .fan_out(RoundStage::Urgency, units, &NoObserver)
            .await;

        assert_eq!(report.successes, vec![(AgentId::new(1), 1)]);
        assert_eq!(
            report.failures[0].error,
            DecisionError::Timeout(Duration::from_secs(5))
        );
    }

    #[tokio::test]
    async fn test_fatal_failure_waits_for_siblings() {
        let finished = Arc::new(AtomicUsize::new(0));
        let sibling_done = Arc::clone(&finished);
        let units: Vec<(AgentId, Unit)> = vec![
            (
                AgentId::new(0),
                unit(async { Err(DecisionError::ChannelUnavailable("quota".into())) }),
            ),
            (
                AgentId::new(1),
                unit(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    sibling_done.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                }),
            ),
        ];

        let report = RoundExecutor::new(2)
            .fan_out(RoundStage::Voting, units, &NoObserver)
            .await;

        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(report.fatal().unwrap().agent, AgentId::new(0));
        assert_eq!(report.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let observer = CountingObserver::default();
        let report: FanOut<usize> = RoundExecutor::new(4)
            .fan_out(RoundStage::Discussion, Vec::<(AgentId, Unit)>::new(), &observer)
            .await;
        assert!(report.is_empty());
        assert_eq!(observer.finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_width() {
        let executor = RoundExecutor::new(8);
        assert_eq!(executor.width(3), 3);
        assert_eq!(executor.width(20), 8);
        assert_eq!(RoundExecutor::new(0).worker_cap(), 1);
    }
}
