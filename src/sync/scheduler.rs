//! Debounced, single-flight sync scheduling.
//!
//! ```text
//! Idle --schedule--> Debouncing --timer--> Syncing --done--> Idle
//!                    ^      |                 |
//!                    +------+ schedule        | schedule: recorded as pending
//!                   (cancel + re-arm)         v
//!                                   re-armed after completion if pending
//!                                   or the response was superseded
//! ```
//!
//! The timer is an owned task handle. Rescheduling aborts it and arms a new
//! one; a generation counter makes a timer that already fired but lost the
//! race a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

use super::accumulator::SyncTrigger;
use super::service::{SyncOutcome, SyncService};
use super::transport::SyncTransport;

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Debouncing,
    Syncing,
}

enum State {
    Idle,
    Debouncing(JoinHandle<()>),
    Syncing { pending: bool },
}

struct Machine {
    state: State,
    generation: u64,
    last_outcome: Option<SyncOutcome>,
}

struct Shared<T> {
    service: Arc<SyncService<T>>,
    debounce: Duration,
    machine: Mutex<Machine>,
    settled: Notify,
}

enum Step {
    Done,
    Run,
    Wait,
}

impl<T: SyncTransport + 'static> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Machine> {
        // No invariant can be broken mid-update, so a poisoned lock is still usable.
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn arm(shared: &Arc<Self>, machine: &mut Machine) {
        machine.generation += 1;
        let generation = machine.generation;
        let task = shared.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(task.debounce).await;
            Shared::fire(&task, generation).await;
        });
        machine.state = State::Debouncing(handle);
    }

    fn schedule(shared: &Arc<Self>) {
        let mut machine = shared.lock();
        match &mut machine.state {
            State::Syncing { pending } => {
                debug!("Sync in progress, recording trigger");
                *pending = true;
                return;
            }
            State::Debouncing(handle) => handle.abort(),
            State::Idle => {}
        }
        Shared::arm(shared, &mut machine);
    }

    async fn fire(shared: &Arc<Self>, generation: u64) {
        {
            let mut machine = shared.lock();
            if machine.generation != generation
                || !matches!(machine.state, State::Debouncing(_))
            {
                return;
            }
            machine.state = State::Syncing { pending: false };
        }
        Shared::run(shared).await;
    }

    /// Runs one round-trip. The caller has already moved the state to `Syncing`.
    async fn run(shared: &Arc<Self>) -> SyncOutcome {
        let outcome = shared.service.sync_now().await;

        {
            let mut machine = shared.lock();
            let pending = matches!(machine.state, State::Syncing { pending: true });
            machine.state = State::Idle;
            machine.last_outcome = Some(outcome.clone());

            if pending || outcome == SyncOutcome::Superseded {
                debug!("Re-arming sync after round-trip");
                Shared::arm(shared, &mut machine);
            }
        }
        shared.settled.notify_waiters();

        outcome
    }
}

/// Decides when a reconciliation round-trip happens.
pub struct SyncScheduler<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for SyncScheduler<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: SyncTransport + 'static> SyncScheduler<T> {
    pub fn new(service: Arc<SyncService<T>>, debounce: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                service,
                debounce,
                machine: Mutex::new(Machine {
                    state: State::Idle,
                    generation: 0,
                    last_outcome: None,
                }),
                settled: Notify::new(),
            }),
        }
    }

    pub fn service(&self) -> &Arc<SyncService<T>> {
        &self.shared.service
    }

    /// Arms (or re-arms) the debounce timer. Must be called within a Tokio runtime.
    pub fn schedule_sync(&self) {
        Shared::schedule(&self.shared);
    }

    pub fn state(&self) -> SchedulerState {
        match self.shared.lock().state {
            State::Idle => SchedulerState::Idle,
            State::Debouncing(_) => SchedulerState::Debouncing,
            State::Syncing { .. } => SchedulerState::Syncing,
        }
    }

    pub fn last_outcome(&self) -> Option<SyncOutcome> {
        self.shared.lock().last_outcome.clone()
    }

    /// Drops a pending debounce without syncing. An in-flight round-trip is
    /// left alone.
    pub fn cancel(&self) {
        let mut machine = self.shared.lock();
        if let State::Debouncing(handle) = &machine.state {
            handle.abort();
            machine.generation += 1;
            machine.state = State::Idle;
        }
    }

    /// Runs any pending sync now and waits until the scheduler settles.
    ///
    /// Returns the outcome of the last round-trip run or awaited, or `None`
    /// if nothing was pending.
    pub async fn flush(&self) -> Option<SyncOutcome> {
        let mut result = None;

        loop {
            let settled = self.shared.settled.notified();

            let step = {
                let mut machine = self.shared.lock();
                match &machine.state {
                    State::Idle => Step::Done,
                    State::Syncing { .. } => Step::Wait,
                    State::Debouncing(handle) => {
                        handle.abort();
                        machine.generation += 1;
                        machine.state = State::Syncing { pending: false };
                        Step::Run
                    }
                }
            };

            match step {
                Step::Done => return result,
                Step::Run => result = Some(Shared::run(&self.shared).await),
                Step::Wait => {
                    settled.await;
                    result = self.last_outcome();
                }
            }
        }
    }
}

impl<T: SyncTransport + 'static> SyncTrigger for SyncScheduler<T> {
    fn schedule_sync(&self) {
        SyncScheduler::schedule_sync(self);
    }
}
