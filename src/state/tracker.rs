use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;

use crate::model::MachineFact;

use super::LifecycleGateway;

/// What the tracker publishes after every poll.
#[derive(Clone, Debug)]
pub enum TrackerEvent {
    /// The new fact, published even when identical to the previous one;
    /// dependents decide whether to act. `detail_error` carries a failed
    /// detail call behind a partially populated fact.
    Fact {
        fact: MachineFact,
        detail_error: Option<String>,
    },

    /// Refresh failed outright; the previous fact remains in force.
    Error(String),
}

/// Single writer of the process-wide `MachineFact`.
///
/// Refreshes are serialized by construction: the poll loop below awaits each
/// refresh before looking at the next tick or poke, so two detail calls for
/// the same tracker can never overlap.
pub struct ActiveMachineTracker<G> {
    gateway: Arc<G>,
    fact: MachineFact,
}

impl<G: LifecycleGateway> ActiveMachineTracker<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        ActiveMachineTracker {
            gateway,
            fact: MachineFact::none(),
        }
    }

    pub fn fact(&self) -> &MachineFact {
        &self.fact
    }

    /// One refresh. On success the stored fact is replaced wholesale; on
    /// failure it is retained unchanged — stale-but-valid beats discarding
    /// known state.
    pub async fn refresh(&mut self) -> TrackerEvent {
        match self.gateway.active_machine().await {
            Ok(poll) => {
                self.fact = poll.fact.clone();
                TrackerEvent::Fact {
                    fact: poll.fact,
                    detail_error: poll.detail_error,
                }
            }
            Err(err) => TrackerEvent::Error(format!("{:#}", err)),
        }
    }

    /// Poll loop: a fixed cadence plus out-of-cycle pokes (fired after any
    /// successful mutation so the UI converges without waiting a full
    /// interval). Ends when the receiving side goes away.
    pub async fn run(
        mut self,
        every: Duration,
        poke: Arc<Notify>,
        tx: UnboundedSender<TrackerEvent>,
    ) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = poke.notified() => {}
                _ = tx.closed() => break,
            }
            let event = self.refresh().await;
            if tx.send(event).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/state/tracker_tests.rs"]
mod tests;
