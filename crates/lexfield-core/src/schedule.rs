//! Cooperative scheduling primitives.
//!
//! The field runs on a single-threaded event loop. Nothing here spawns or
//! sleeps: the host drives time by calling [`RoundScheduler::advance`] once per
//! scheduling round (microtask, animation frame) and by reporting idle time or
//! the current instant to an [`IdleDispatcher`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Cooperative cancellation flag shared between a scheduler entry and its owner.
///
/// Cancelling only sets the flag; the scheduler checks it before handing the
/// payload back and drops cancelled entries silently.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    due: u64,
    cancel: CancelHandle,
    payload: T,
}

/// Runs payloads after a fixed number of cooperative scheduling rounds.
///
/// The round counter is explicit so tests can step through "settle" delays
/// deterministically instead of depending on frame timing.
#[derive(Debug)]
pub struct RoundScheduler<T> {
    round: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Default for RoundScheduler<T> {
    fn default() -> Self {
        Self {
            round: 0,
            queue: Vec::new(),
        }
    }
}

impl<T> RoundScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds advanced so far.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Queue `payload` to become due after `rounds` calls to [`advance`](Self::advance).
    pub fn schedule(&mut self, rounds: u32, payload: T) -> CancelHandle {
        let cancel = CancelHandle::new();
        self.queue.push(Scheduled {
            due: self.round + u64::from(rounds),
            cancel: cancel.clone(),
            payload,
        });
        cancel
    }

    /// Advance one round and return the payloads now due, in scheduling order.
    pub fn advance(&mut self) -> Vec<T> {
        self.round += 1;

        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.queue.len());
        for entry in std::mem::take(&mut self.queue) {
            if entry.cancel.is_cancelled() {
                continue;
            }
            if entry.due <= self.round {
                due.push(entry.payload);
            } else {
                waiting.push(entry);
            }
        }
        self.queue = waiting;
        due
    }

    /// Entries still waiting and not cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|entry| !entry.cancel.is_cancelled())
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

#[derive(Debug)]
struct PendingDispatch<T> {
    payload: T,
    deadline: Instant,
}

/// Coalesces bursts of work into one idle-time dispatch.
///
/// Only the latest payload is kept. It runs when the host reports idle time,
/// or at the latest once `timeout` has elapsed since it was scheduled.
#[derive(Debug)]
pub struct IdleDispatcher<T> {
    timeout: Duration,
    pending: Option<PendingDispatch<T>>,
}

impl<T> IdleDispatcher<T> {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            pending: None,
        }
    }

    /// Schedule `payload`, returning the earlier payload it supersedes.
    pub fn schedule(&mut self, payload: T, now: Instant) -> Option<T> {
        let previous = self.pending.replace(PendingDispatch {
            payload,
            deadline: now + self.timeout,
        });
        previous.map(|p| p.payload)
    }

    /// The host has idle time: hand back whatever is pending.
    pub fn take_idle(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    /// Hand back the pending payload only if its deadline has passed.
    pub fn take_expired(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.take_idle(),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.take_idle()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }
}
