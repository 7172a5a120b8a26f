//! Focus underline of text inputs
//!
//! The line grows to the full host width when the host gains focus and
//! shrinks back to nothing when it loses it.

use std::cell::Cell;
use std::rc::Rc;

use lumen_animation::{AnimationListener, Animator, SchedulerHandle};
use lumen_core::{Color, DrawSurface, DrawSurfaceExt, Rect};

use crate::host::HostRef;

pub const LINE_DURATION_MS: u64 = 200;

/// The per-tick step is `width / LINE_STEPS`
pub const LINE_STEPS: f64 = 200.0;

/// Underline thickness in pixels
pub const LINE_THICKNESS: f32 = 2.0;

/// Distance from the host's bottom edge to the top of the underline
pub const LINE_BOTTOM_OFFSET: f32 = 5.0;

struct LineState {
    host: HostRef,
    width: Cell<f64>,
    target_width: Cell<f64>,
    increment: Cell<f64>,
}

impl AnimationListener for LineState {
    // Accumulates a fixed step per tick rather than interpolating from the
    // percent; coalesced ticks leave the line short until the final snap.
    fn on_animation(&self, _percent: f64) {
        self.width.set(self.width.get() + self.increment.get());
        self.host.repaint();
    }

    fn on_stop(&self) {
        self.width.set(self.target_width.get());
        self.host.repaint();
    }

    fn on_end(&self) {
        self.width.set(self.target_width.get());
        self.host.repaint();
    }
}

pub struct MaterialLine {
    state: Rc<LineState>,
    animator: Animator,
}

impl MaterialLine {
    pub fn new(host: HostRef, scheduler: &SchedulerHandle) -> Self {
        let state = Rc::new(LineState {
            host,
            width: Cell::new(0.0),
            target_width: Cell::new(0.0),
            increment: Cell::new(0.0),
        });
        let animator = Animator::new(scheduler.clone(), state.clone());
        animator.set_delay(0).set_duration(LINE_DURATION_MS);
        Self { state, animator }
    }

    /// Re-read the host's focus and animate toward the matching width
    ///
    /// Call on every focus or content change.
    pub fn update(&self) {
        self.animator.stop();

        let state = &self.state;
        let (host_width, _) = state.host.size().to_pixels();
        let host_width = host_width as f64;
        if state.host.has_focus() {
            state.target_width.set(host_width);
            state.increment.set(host_width / LINE_STEPS);
        } else {
            state.target_width.set(0.0);
            state.increment.set(-host_width / LINE_STEPS);
        }

        self.animator.start();
    }

    pub fn width(&self) -> f64 {
        self.state.width.get()
    }

    pub fn target_width(&self) -> f64 {
        self.state.target_width.get()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Draw the underline centered along the bottom of the host
    pub fn paint(&self, surface: &mut dyn DrawSurface, color: Color) {
        let (host_width, host_height) = self.state.host.size().to_pixels();
        let line_width = self.width() as i64;
        if line_width <= 0 {
            return;
        }
        let x = (host_width as i64 - line_width) / 2;
        surface.fill_rect(
            Rect::new(
                x as f32,
                host_height as f32 - LINE_BOTTOM_OFFSET,
                line_width as f32,
                LINE_THICKNESS,
            ),
            color,
        );
    }
}
