//! Timer queue - host-driven one-shot and repeating timers
//!
//! The queue never reads a clock. The host calls [`TimerQueue::advance_to`]
//! with its current time (a redraw timestamp in the browser, a tokio
//! interval in the CLI) and gets back every timer that came due, in order.
//! Whoever creates a timer keeps its [`TimerId`] and must cancel it when
//! the owner goes away.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Timer {
    interval_ms: u64,
    next_due: u64,
    repeating: bool,
}

/// Single-threaded timer wheel advanced by the host
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: BTreeMap<TimerId, Timer>,
    next_id: u64,
    now: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the last [`advance_to`](Self::advance_to) or [`sync_to`](Self::sync_to) call
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock to the host's time without firing anything.
    ///
    /// New timers count from here. Timers that are already overdue fire on
    /// the next [`advance_to`](Self::advance_to).
    pub fn sync_to(&mut self, now: u64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Fire every `interval_ms` until canceled
    pub fn set_interval(&mut self, interval_ms: u64) -> TimerId {
        self.schedule(interval_ms, true)
    }

    /// Fire once after `delay_ms`
    pub fn set_timeout(&mut self, delay_ms: u64) -> TimerId {
        self.schedule(delay_ms, false)
    }

    fn schedule(&mut self, ms: u64, repeating: bool) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let interval_ms = ms.max(1);
        self.timers.insert(
            id,
            Timer {
                interval_ms,
                next_due: self.now + interval_ms,
                repeating,
            },
        );
        trace!(timer = %id, interval_ms, repeating, "Timer scheduled");
        id
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was canceled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let removed = self.timers.remove(&id).is_some();
        if removed {
            trace!(timer = %id, "Timer canceled");
        }
        removed
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Move the clock forward and collect every firing up to `now`.
    ///
    /// Firings come back ordered by due time. A repeating timer fires at
    /// most once per call: missed periods (a throttled background tab)
    /// collapse into one firing and the next one is due a full interval
    /// after `now`. Time never moves backwards.
    pub fn advance_to(&mut self, now: u64) -> Vec<TimerId> {
        if now < self.now {
            return Vec::new();
        }

        let mut fired = Vec::new();
        loop {
            let due = self
                .timers
                .iter()
                .filter(|(_, t)| t.next_due <= now)
                .min_by_key(|(id, t)| (t.next_due, **id))
                .map(|(id, t)| (*id, t.next_due));

            let Some((id, due_at)) = due else { break };
            self.now = due_at;
            fired.push(id);

            let reschedule = match self.timers.get_mut(&id) {
                Some(timer) if timer.repeating => {
                    timer.next_due += timer.interval_ms;
                    if timer.next_due <= now {
                        timer.next_due = now + timer.interval_ms;
                    }
                    true
                }
                _ => false,
            };
            if !reschedule {
                self.timers.remove(&id);
            }
        }

        self.now = now;
        fired
    }
}
