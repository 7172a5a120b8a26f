//! Percent-driven animator
//!
//! An [`Animator`] owns one timer on the scheduler. While running it reports
//! `elapsed / duration` to its listener on every tick; once elapsed reaches
//! the duration it stops ticking and delivers `on_end` on the next
//! cooperative turn.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::listener::AnimationListener;
use crate::scheduler::{SchedulerHandle, TimerId, TimerTarget};

/// Tick period requested from the scheduler; ticks are coalesced, so this is
/// "as often as the event loop allows"
pub const TICK_PERIOD_MS: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    /// Final tick delivered, `on_end` queued for the next turn
    Finishing,
}

struct AnimatorCore {
    handle: SchedulerHandle,
    timer: Option<TimerId>,
    listener: Box<dyn AnimationListener>,
    this: Weak<AnimatorCore>,
    duration_ms: Cell<u64>,
    delay_ms: Cell<u64>,
    start_ms: Cell<u64>,
    state: Cell<RunState>,
    /// Bumped on every start so stale completions can be recognized
    run: Cell<u64>,
}

impl AnimatorCore {
    fn start(&self) {
        self.stop();
        self.listener.on_start();

        let (Some(timer), Some(now)) = (self.timer, self.handle.now_ms()) else {
            tracing::warn!("animator started without a live scheduler; completing immediately");
            self.listener.on_animation(1.0);
            self.listener.on_end();
            return;
        };

        self.run.set(self.run.get().wrapping_add(1));
        self.start_ms.set(now);
        self.state.set(RunState::Running);
        self.handle
            .arm_timer(timer, self.delay_ms.get(), TICK_PERIOD_MS);

        tracing::debug!(
            run = self.run.get(),
            delay_ms = self.delay_ms.get(),
            duration_ms = self.duration_ms.get(),
            "animator started"
        );
    }

    fn stop(&self) {
        if self.state.get() == RunState::Idle {
            return;
        }
        self.state.set(RunState::Idle);
        if let Some(timer) = self.timer {
            self.handle.disarm_timer(timer);
        }
        tracing::debug!(run = self.run.get(), "animator stopped");
        self.listener.on_stop();
    }

    fn finish(&self, run: u64) {
        if self.state.get() != RunState::Finishing || self.run.get() != run {
            return;
        }
        self.state.set(RunState::Idle);
        tracing::debug!(run, "animator ended");
        self.listener.on_end();
    }
}

impl TimerTarget for AnimatorCore {
    fn fire(&self, now_ms: u64) {
        if self.state.get() != RunState::Running {
            return;
        }
        let run = self.run.get();
        let elapsed = now_ms.saturating_sub(self.start_ms.get());
        let duration = self.duration_ms.get();
        let percent = if duration == 0 {
            1.0
        } else {
            elapsed as f64 / duration as f64
        };

        self.listener.on_animation(percent);

        // the listener may have stopped or restarted us
        if elapsed < duration || self.run.get() != run || self.state.get() != RunState::Running {
            return;
        }

        self.state.set(RunState::Finishing);
        if let Some(timer) = self.timer {
            self.handle.disarm_timer(timer);
        }
        let this = self.this.clone();
        let queued = self.handle.defer(move || {
            if let Some(core) = this.upgrade() {
                core.finish(run);
            }
        });
        if !queued {
            self.finish(run);
        }
    }
}

/// A single timeline reporting progress to an [`AnimationListener`]
///
/// Delay and duration are zero until set; an unconfigured run completes
/// on its first tick. Dropping the animator
/// removes its timer; an in-flight run ends silently.
pub struct Animator {
    core: Rc<AnimatorCore>,
}

impl Animator {
    /// Create an idle animator bound to `handle`'s scheduler
    pub fn new(handle: SchedulerHandle, listener: impl AnimationListener + 'static) -> Self {
        let listener: Box<dyn AnimationListener> = Box::new(listener);
        let core = Rc::new_cyclic(|this: &Weak<AnimatorCore>| {
            let target: Weak<dyn TimerTarget> = this.clone();
            let timer = handle.register_timer(target);
            AnimatorCore {
                handle,
                timer,
                listener,
                this: this.clone(),
                duration_ms: Cell::new(0),
                delay_ms: Cell::new(0),
                start_ms: Cell::new(0),
                state: Cell::new(RunState::Idle),
                run: Cell::new(0),
            }
        });
        Self { core }
    }

    /// Set the delay before the first tick; applies to the next `start`
    pub fn set_delay(&self, ms: u64) -> &Self {
        self.core.delay_ms.set(ms);
        self
    }

    /// Set the run length; applies to the next `start`
    pub fn set_duration(&self, ms: u64) -> &Self {
        self.core.duration_ms.set(ms);
        self
    }

    pub fn delay(&self) -> u64 {
        self.core.delay_ms.get()
    }

    pub fn duration(&self) -> u64 {
        self.core.duration_ms.get()
    }

    /// Begin a new run
    ///
    /// A run already in progress is stopped first (its listener sees
    /// `on_stop`), then `on_start` fires and ticks begin after the delay.
    pub fn start(&self) {
        self.core.start();
    }

    /// Halt the current run and fire `on_stop`; no-op when idle
    pub fn stop(&self) {
        self.core.stop();
    }

    /// True from `start` until `on_end` or `on_stop` has been delivered
    pub fn is_running(&self) -> bool {
        self.core.state.get() != RunState::Idle
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        if let Some(timer) = self.core.timer {
            self.core.handle.remove_timer(timer);
        }
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("duration_ms", &self.core.duration_ms.get())
            .field("delay_ms", &self.core.delay_ms.get())
            .field("state", &self.core.state.get())
            .finish()
    }
}
