//! Cooperative animation scheduler
//!
//! The scheduler owns one timer per animator plus a FIFO of deferred tasks.
//! The host event loop drives it by calling [`AnimationScheduler::pump`]
//! once per turn; everything runs on that one thread.
//!
//! Animators and effects hold a [`SchedulerHandle`], a weak reference that
//! degrades gracefully once the scheduler is dropped.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::clock::{Clock, SystemClock};

new_key_type! {
    /// Handle to a timer registered with the scheduler
    pub struct TimerId;
}

/// Something a timer fires into
pub(crate) trait TimerTarget {
    fn fire(&self, now_ms: u64);
}

/// Callback invoked after a pump that fired at least one timer, so a UI can
/// schedule a repaint
pub type WakeCallback = Rc<dyn Fn()>;

type Task = Box<dyn FnOnce()>;

struct Timer {
    target: Weak<dyn TimerTarget>,
    armed: bool,
    due_ms: u64,
    period_ms: u64,
}

struct SchedulerInner {
    clock: Rc<dyn Clock>,
    timers: SlotMap<TimerId, Timer>,
    deferred: VecDeque<Task>,
    wake_callback: Option<WakeCallback>,
    turns: u64,
}

impl SchedulerInner {
    fn next_due_ms(&self) -> Option<u64> {
        self.timers
            .values()
            .filter(|timer| timer.armed)
            .map(|timer| timer.due_ms)
            .min()
    }
}

/// Tick source for all animators on one event loop
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    /// Create a scheduler driven by wall-clock time
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Create a scheduler driven by a custom clock
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                clock: Rc::new(clock),
                timers: SlotMap::with_key(),
                deferred: VecDeque::new(),
                wake_callback: None,
                turns: 0,
            })),
        }
    }

    /// Get a weak handle for animators and effects
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current clock reading
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().clock.now_ms()
    }

    /// Install the callback fired after each pump that ticked a timer
    pub fn set_wake_callback<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.borrow_mut().wake_callback = Some(Rc::new(callback));
    }

    /// Run one cooperative turn
    ///
    /// First runs the deferred tasks that were queued before this turn
    /// (tasks they queue wait for the next turn), then fires every armed
    /// timer whose due time has passed. Late timers fire once, not once per
    /// missed period. No internal borrow is held while user code runs.
    ///
    /// Returns true if work remains.
    pub fn pump(&self) -> bool {
        let tasks: Vec<Task> = {
            let mut inner = self.inner.borrow_mut();
            inner.turns += 1;
            inner.deferred.drain(..).collect()
        };
        let ran_tasks = tasks.len();
        for task in tasks {
            task();
        }

        let now = self.now_ms();
        let due: SmallVec<[(TimerId, Weak<dyn TimerTarget>); 8]> = {
            let mut inner = self.inner.borrow_mut();
            inner
                .timers
                .iter_mut()
                .filter(|(_, timer)| timer.armed && timer.due_ms <= now)
                .map(|(id, timer)| {
                    timer.due_ms = now.saturating_add(timer.period_ms);
                    (id, timer.target.clone())
                })
                .collect()
        };

        let mut fired = 0usize;
        for (id, target) in &due {
            // an earlier callback this turn may have disarmed or removed it
            let still_armed = self
                .inner
                .borrow()
                .timers
                .get(*id)
                .is_some_and(|timer| timer.armed);
            if !still_armed {
                continue;
            }
            if let Some(target) = target.upgrade() {
                target.fire(now);
                fired += 1;
            }
        }

        if fired > 0 {
            let wake = self.inner.borrow().wake_callback.clone();
            if let Some(wake) = wake {
                wake();
            }
        }

        tracing::trace!(now, ran_tasks, fired, "scheduler pump");

        self.has_pending_work()
    }

    /// True while a deferred task is queued or any timer is armed
    pub fn has_pending_work(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.deferred.is_empty() || inner.timers.values().any(|timer| timer.armed)
    }

    /// Number of registered timers (one per live animator)
    pub fn timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Number of timers currently ticking
    pub fn armed_count(&self) -> usize {
        self.inner
            .borrow()
            .timers
            .values()
            .filter(|timer| timer.armed)
            .count()
    }

    /// Number of turns pumped so far
    pub fn turns(&self) -> u64 {
        self.inner.borrow().turns
    }

    /// Pump until no work remains, sleeping between turns
    ///
    /// Sleeps at most `frame_interval` between turns, less if a timer is due
    /// sooner. Intended for headless drivers; with a
    /// [`ManualClock`](crate::ManualClock) the caller must advance time
    /// itself instead.
    pub fn run_until_idle(&self, frame_interval: Duration) {
        while self.pump() {
            let wait = {
                let inner = self.inner.borrow();
                if !inner.deferred.is_empty() {
                    continue;
                }
                let now = inner.clock.now_ms();
                match inner.next_due_ms() {
                    Some(due) => {
                        Duration::from_millis(due.saturating_sub(now)).min(frame_interval)
                    }
                    None => continue,
                }
            };
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
        }
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak reference to an [`AnimationScheduler`]
///
/// Every operation is a no-op (or reports failure) once the scheduler is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// A handle that was never attached to a scheduler
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Current clock reading, if the scheduler is alive
    pub fn now_ms(&self) -> Option<u64> {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().clock.now_ms())
    }

    /// Queue `task` to run at the start of the next turn
    ///
    /// Returns false (dropping the task) if the scheduler is gone.
    pub fn defer<F>(&self, task: F) -> bool
    where
        F: FnOnce() + 'static,
    {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.borrow_mut().deferred.push_back(Box::new(task));
                true
            }
            None => false,
        }
    }

    pub(crate) fn register_timer(&self, target: Weak<dyn TimerTarget>) -> Option<TimerId> {
        let inner = self.inner.upgrade()?;
        let id = inner.borrow_mut().timers.insert(Timer {
            target,
            armed: false,
            due_ms: 0,
            period_ms: 1,
        });
        Some(id)
    }

    /// Arm `id` so it first fires `delay_ms` from now, then every `period_ms`
    pub(crate) fn arm_timer(&self, id: TimerId, delay_ms: u64, period_ms: u64) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let mut inner = inner.borrow_mut();
        let now = inner.clock.now_ms();
        match inner.timers.get_mut(id) {
            Some(timer) => {
                timer.armed = true;
                timer.due_ms = now.saturating_add(delay_ms);
                timer.period_ms = period_ms.max(1);
                true
            }
            None => false,
        }
    }

    pub(crate) fn disarm_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(timer) = inner.borrow_mut().timers.get_mut(id) {
                timer.armed = false;
            }
        }
    }

    pub(crate) fn remove_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().timers.remove(id);
        }
    }
}
