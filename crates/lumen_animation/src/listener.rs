//! Animation listener contract

use std::rc::Rc;

/// Receives the lifecycle of an [`Animator`](crate::Animator) run
///
/// Methods take `&self`: listeners keep their mutable state in `Cell` or
/// `RefCell` fields, which lets a callback call back into its own animator
/// (for example restarting it from `on_end`) without aliasing problems.
///
/// For one run the calls arrive as `on_start`, any number of
/// `on_animation`, then exactly one of `on_stop` (preempted) or `on_end`
/// (completed).
pub trait AnimationListener {
    /// A new run is about to begin
    fn on_start(&self) {}

    /// Progress tick; `percent` is `elapsed / duration` and is not clamped,
    /// so the last tick of a run can report slightly more than `1.0`
    fn on_animation(&self, percent: f64);

    /// The run was cancelled by `stop()` or by a newer `start()`
    fn on_stop(&self);

    /// The run reached its duration
    fn on_end(&self);
}

impl<T: AnimationListener + ?Sized> AnimationListener for Rc<T> {
    fn on_start(&self) {
        (**self).on_start();
    }

    fn on_animation(&self, percent: f64) {
        (**self).on_animation(percent);
    }

    fn on_stop(&self) {
        (**self).on_stop();
    }

    fn on_end(&self) {
        (**self).on_end();
    }
}

impl<T: AnimationListener + ?Sized> AnimationListener for Box<T> {
    fn on_start(&self) {
        (**self).on_start();
    }

    fn on_animation(&self, percent: f64) {
        (**self).on_animation(percent);
    }

    fn on_stop(&self) {
        (**self).on_stop();
    }

    fn on_end(&self) {
        (**self).on_end();
    }
}
