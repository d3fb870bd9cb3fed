//! Cancelable one-shot timers.
//!
//! The controller never sleeps or spawns; it asks a [`Scheduler`] for a timer
//! and holds the returned [`TimerHandle`]. When the timer elapses the host
//! runtime feeds the [`TimerId`] back in as an event. Dropping or replacing a
//! handle cancels its timer, so a pending dispatch can never outlive the
//! controller that requested it.
//!
//! [`ManualScheduler`] is a virtual clock: time only moves when
//! [`ManualScheduler::advance`] is called, which makes timing behavior fully
//! deterministic.
//!
//! # Example
//!
//! ```rust
//! use musician_search::timer::{ManualScheduler, Scheduler, TimerHandle};
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let clock = Rc::new(ManualScheduler::new());
//! let scheduler: Rc<dyn Scheduler> = clock.clone();
//!
//! let handle = TimerHandle::start(&scheduler, Duration::from_millis(350));
//! assert!(clock.advance(Duration::from_millis(349)).is_empty());
//! assert_eq!(clock.advance(Duration::from_millis(1)), vec![handle.id()]);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Identifier of a scheduled timer, unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Source of one-shot timers.
///
/// Implementations run on the single UI thread; methods take `&self` and use
/// interior mutability so a scheduler can be shared through `Rc`.
pub trait Scheduler {
    /// Current time on this scheduler's clock, measured from its creation.
    fn now(&self) -> Duration;

    /// Arms a timer that elapses `delay` from now.
    fn schedule(&self, delay: Duration) -> TimerId;

    /// Disarms a timer. Returns `false` if it already fired or was canceled.
    fn cancel(&self, id: TimerId) -> bool;
}

/// Owning handle for an armed timer.
///
/// The timer is canceled when the handle is canceled explicitly or dropped.
pub struct TimerHandle {
    id: TimerId,
    deadline: Duration,
    scheduler: Rc<dyn Scheduler>,
}

impl TimerHandle {
    /// Arms a timer on `scheduler` and takes ownership of it.
    #[must_use]
    pub fn start(scheduler: &Rc<dyn Scheduler>, delay: Duration) -> Self {
        let id = scheduler.schedule(delay);
        Self {
            id,
            deadline: scheduler.now() + delay,
            scheduler: Rc::clone(scheduler),
        }
    }

    #[must_use]
    pub const fn id(&self) -> TimerId {
        self.id
    }

    /// Clock time at which the timer elapses.
    #[must_use]
    pub const fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Cancels the timer now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if self.scheduler.cancel(self.id) {
            tracing::trace!(timer = %self.id, "timer canceled");
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    armed: Vec<(Duration, TimerId)>,
}

/// Deterministic virtual-time scheduler.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    clock: RefCell<Clock>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward and returns the timers that elapsed, in
    /// deadline order (ties in scheduling order).
    pub fn advance(&self, by: Duration) -> Vec<TimerId> {
        let mut clock = self.clock.borrow_mut();
        let target = clock.now + by;

        let mut due: Vec<(Duration, TimerId)> = Vec::new();
        clock.armed.retain(|&(deadline, id)| {
            if deadline <= target {
                due.push((deadline, id));
                false
            } else {
                true
            }
        });
        due.sort_unstable();
        clock.now = target;
        drop(clock);

        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Number of timers still armed.
    #[must_use]
    pub fn armed(&self) -> usize {
        self.clock.borrow().armed.len()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    fn schedule(&self, delay: Duration) -> TimerId {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = TimerId(clock.next_id);
        let deadline = clock.now + delay;
        clock.armed.push((deadline, id));
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut clock = self.clock.borrow_mut();
        let before = clock.armed.len();
        clock.armed.retain(|&(_, armed)| armed != id);
        clock.armed.len() != before
    }
}
