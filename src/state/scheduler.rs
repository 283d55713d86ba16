//! Scheduler Module - Cooperative single-threaded timers.
//!
//! All carousel timing (the simulated load delay, the auto-scroll interval,
//! the transition-mutex release) runs through one logical-clock scheduler.
//! The host loop pumps it with real elapsed time; tests pump it with exact
//! durations, which makes every timing law deterministic.
//!
//! Due callbacks fire in deadline order (registration order on ties), with
//! the clock set to each deadline while its callback runs. Callbacks may
//! schedule or cancel timers re-entrantly, including their own interval.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_carousel::state::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let id = scheduler.set_interval(Duration::from_secs(5), || {
//!     // advance the carousel
//! });
//!
//! scheduler.advance(Duration::from_secs(12)); // fires twice
//! scheduler.clear(id);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{trace, warn};

// =============================================================================
// Types
// =============================================================================

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(usize);

struct Timer {
    id: TimerId,
    deadline: Duration,
    period: Option<Duration>,
    /// Monotonic sequence for stable ordering on equal deadlines.
    seq: usize,
    callback: Rc<dyn Fn()>,
}

struct SchedulerInner {
    now: Duration,
    next_id: usize,
    next_seq: usize,
    timers: Vec<Timer>,
}

/// Cooperative timer service. Clones share the same clock and timer set.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    /// Create a scheduler with its clock at zero.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                now: Duration::ZERO,
                next_id: 0,
                next_seq: 0,
                timers: Vec::new(),
            })),
        }
    }

    /// Current logical time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Schedule a one-shot callback `delay` from now.
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: Fn() + 'static,
    {
        self.schedule(delay, None, Rc::new(callback))
    }

    /// Schedule a repeating callback every `period`, first firing one period
    /// from now.
    ///
    /// A zero period would never let the clock progress; it is refused with a
    /// warning and the returned id is inert.
    pub fn set_interval<F>(&self, period: Duration, callback: F) -> TimerId
    where
        F: Fn() + 'static,
    {
        if period.is_zero() {
            warn!("refusing zero-period interval");
            return self.allocate_id();
        }
        self.schedule(period, Some(period), Rc::new(callback))
    }

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled.
    pub fn clear(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.timers.len();
        inner.timers.retain(|t| t.id != id);
        inner.timers.len() < before
    }

    /// Move the clock forward by `dt`, firing every timer that comes due.
    ///
    /// The clock is set to each timer's deadline while its callback runs, so
    /// a callback that schedules a follow-up within the advanced window will
    /// see that follow-up fire in the same call.
    pub fn advance(&self, dt: Duration) {
        let target = self.inner.borrow().now + dt;

        loop {
            let next = {
                let inner = self.inner.borrow();
                inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.deadline <= target)
                    .min_by_key(|(_, t)| (t.deadline, t.seq))
                    .map(|(index, t)| (index, t.deadline))
            };

            let Some((index, deadline)) = next else {
                self.inner.borrow_mut().now = target;
                return;
            };

            // Re-arm intervals before invoking, so a callback clearing its
            // own timer removes the re-armed entry.
            let callback = {
                let mut inner = self.inner.borrow_mut();
                inner.now = deadline;
                match inner.timers[index].period {
                    Some(period) => {
                        let seq = inner.next_seq;
                        inner.next_seq += 1;
                        let timer = &mut inner.timers[index];
                        timer.deadline = deadline + period;
                        timer.seq = seq;
                        timer.callback.clone()
                    }
                    None => inner.timers.remove(index).callback,
                }
            };

            // No registry borrow is held here; callbacks may schedule freely.
            callback();
        }
    }

    fn schedule(&self, delay: Duration, period: Option<Duration>, callback: Rc<dyn Fn()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let deadline = inner.now + delay;
        trace!(?id, ?deadline, repeating = period.is_some(), "timer scheduled");
        inner.timers.push(Timer {
            id,
            deadline,
            period,
            seq,
            callback,
        });
        id
    }

    fn allocate_id(&self) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        id
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
