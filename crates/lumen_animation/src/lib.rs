//! Lumen Animation System
//!
//! Percent-driven animators multiplexed on a single-threaded cooperative
//! scheduler.
//!
//! # Features
//!
//! - **Animator**: one timeline per instance, reporting `elapsed / duration`
//!   to an [`AnimationListener`] with a start/stop/end lifecycle
//! - **AnimationScheduler**: the tick source; one timer per animator, many
//!   independent timelines on one event loop
//! - **Deferred completion**: `on_end` is delivered on the next cooperative
//!   turn, so listeners can restart their animator safely
//! - **Clocks**: wall-clock [`SystemClock`] or a [`ManualClock`] for
//!   deterministic stepping
//!
//! # Example
//!
//! ```rust
//! use lumen_animation::{AnimationListener, AnimationScheduler, Animator, ManualClock};
//!
//! struct Fade;
//!
//! impl AnimationListener for Fade {
//!     fn on_animation(&self, percent: f64) {
//!         println!("opacity {percent:.2}");
//!     }
//!     fn on_stop(&self) {}
//!     fn on_end(&self) {}
//! }
//!
//! let clock = ManualClock::new();
//! let scheduler = AnimationScheduler::with_clock(clock.clone());
//! let animator = Animator::new(scheduler.handle(), Fade);
//! animator.set_delay(0).set_duration(200);
//! animator.start();
//!
//! clock.advance(200);
//! scheduler.pump(); // final tick, completion queued
//! scheduler.pump(); // on_end delivered
//! assert!(!animator.is_running());
//! ```

pub mod animator;
pub mod clock;
pub mod listener;
pub mod scheduler;

pub use animator::{Animator, TICK_PERIOD_MS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use listener::AnimationListener;
pub use scheduler::{AnimationScheduler, SchedulerHandle, TimerId, WakeCallback};
