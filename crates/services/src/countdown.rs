//! Countdown plumbing for the per-question timer.
//!
//! The engine itself only exposes `Session::tick`; something has to call
//! it once a second while a question is open, and must stop the moment
//! the question is submitted, force-graded, or the session is torn down.
//! A tick that outlives its question is the classic stale-timer bug, so
//! the scheduler hands out cancel handles and [`QuestionTimer`] keeps at
//! most one of them alive.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Cancel handle for a scheduled periodic tick.
pub trait TickHandle: Send {
    /// Stops the tick. Idempotent; a cancelled tick never fires again.
    fn cancel(&self);
}

/// Capability to schedule a periodic callback and get a cancel handle.
pub trait TickScheduler: Send + Sync {
    fn schedule(&self, period: Duration, on_tick: Box<dyn FnMut() + Send>) -> Box<dyn TickHandle>;
}

//
// ─── QUESTION TIMER ────────────────────────────────────────────────────────────
//

/// Owns the single live countdown of a session.
///
/// Starting a timer cancels whatever was running before, so a handle can
/// never fire against a question that has moved on. Dropping the timer
/// cancels too, covering session teardown.
pub struct QuestionTimer {
    scheduler: Arc<dyn TickScheduler>,
    active: Option<Box<dyn TickHandle>>,
}

impl QuestionTimer {
    #[must_use]
    pub fn new(scheduler: Arc<dyn TickScheduler>) -> Self {
        Self {
            scheduler,
            active: None,
        }
    }

    /// Starts a 1-second tick for the current question, cancelling any
    /// previous one first.
    pub fn start(&mut self, on_tick: Box<dyn FnMut() + Send>) {
        self.cancel();
        self.active = Some(self.scheduler.schedule(Duration::from_secs(1), on_tick));
    }

    /// Cancels the live tick, if any. Call on every transition out of the
    /// awaiting-answer state.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

//
// ─── TOKIO SCHEDULER ───────────────────────────────────────────────────────────
//

/// Scheduler backed by a spawned tokio interval task.
///
/// Must be used from within a tokio runtime.
#[derive(Clone, Copy, Default)]
pub struct TokioScheduler;

struct TokioTickHandle {
    task: tokio::task::JoinHandle<()>,
}

impl TickHandle for TokioTickHandle {
    fn cancel(&self) {
        self.task.abort();
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(
        &self,
        period: Duration,
        mut on_tick: Box<dyn FnMut() + Send>,
    ) -> Box<dyn TickHandle> {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick completes immediately; skip it so
            // the countdown starts a full period out.
            interval.tick().await;
            loop {
                interval.tick().await;
                on_tick();
            }
        });
        Box::new(TokioTickHandle { task })
    }
}

//
// ─── MANUAL SCHEDULER ──────────────────────────────────────────────────────────
//

/// Deterministic scheduler for tests: ticks fire only when `fire` is
/// called, and cancelled handles stop receiving them.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

#[derive(Default)]
struct ManualInner {
    next_id: u64,
    callbacks: HashMap<u64, Box<dyn FnMut() + Send>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires every live callback once, simulating one elapsed period.
    ///
    /// # Panics
    ///
    /// Panics on a poisoned scheduler lock; in a test that should fail
    /// loudly, not no-op.
    pub fn fire(&self) {
        let mut inner = self.inner.lock().expect("manual scheduler lock");
        for callback in inner.callbacks.values_mut() {
            callback();
        }
    }

    /// Number of ticks currently scheduled and not cancelled.
    ///
    /// # Panics
    ///
    /// Panics on a poisoned scheduler lock.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.lock().expect("manual scheduler lock").callbacks.len()
    }
}

struct ManualTickHandle {
    id: u64,
    inner: Arc<Mutex<ManualInner>>,
}

impl TickHandle for ManualTickHandle {
    fn cancel(&self) {
        let mut inner = self.inner.lock().expect("manual scheduler lock");
        inner.callbacks.remove(&self.id);
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(
        &self,
        _period: Duration,
        on_tick: Box<dyn FnMut() + Send>,
    ) -> Box<dyn TickHandle> {
        let id = {
            let mut inner = self.inner.lock().expect("manual scheduler lock");
            let id = inner.next_id;
            inner.next_id += 1;
            inner.callbacks.insert(id, on_tick);
            id
        };
        Box::new(ManualTickHandle {
            id,
            inner: self.inner.clone(),
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
