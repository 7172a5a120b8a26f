//! Elevation (lift) effect
//!
//! Raised components paint a cached drop shadow sized to their bounds. Flat
//! components have no shadow; they brighten their background instead, by an
//! amount that follows the same logistic curve as the shadow.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lumen_animation::{AnimationListener, Animator, SchedulerHandle};
use lumen_core::{DrawSurface, Point, Rect};

use crate::host::HostRef;
use crate::shadow::MaterialShadow;

pub const ELEVATION_DURATION_MS: u64 = 500;

/// Background brightness shift for a flat component at `level`
///
/// Zero at level 0, approaching ±33 at the extremes.
pub fn flat_brightness_step(level: f64) -> i32 {
    (66.0 / (1.0 + (-2.0 * level).exp()) - 33.0) as i32
}

struct ElevationState {
    host: HostRef,
    level: Cell<f64>,
    start_level: Cell<f64>,
    target_level: Cell<f64>,
}

impl AnimationListener for ElevationState {
    fn on_animation(&self, percent: f64) {
        let start = self.start_level.get();
        self.level
            .set(start + (self.target_level.get() - start) * percent);
        self.host.repaint();
    }

    fn on_stop(&self) {
        self.level.set(self.target_level.get());
        self.host.repaint();
    }

    fn on_end(&self) {
        self.level.set(self.target_level.get());
        self.host.repaint();
    }
}

/// Animated elevation of a component, in `[0, 5]`
pub struct ElevationEffect {
    state: Rc<ElevationState>,
    animator: Animator,
    shadow: RefCell<MaterialShadow>,
    border_radius: Cell<u32>,
}

impl ElevationEffect {
    pub fn apply_to(host: HostRef, scheduler: &SchedulerHandle, level: f64) -> Self {
        let state = Rc::new(ElevationState {
            host,
            level: Cell::new(level),
            start_level: Cell::new(level),
            target_level: Cell::new(level),
        });
        let animator = Animator::new(scheduler.clone(), state.clone());
        animator.set_delay(0).set_duration(ELEVATION_DURATION_MS);

        Self {
            state,
            animator,
            shadow: RefCell::new(MaterialShadow::new()),
            border_radius: Cell::new(0),
        }
    }

    /// Current, possibly mid-animation, level
    pub fn level(&self) -> f64 {
        self.state.level.get()
    }

    /// Level the effect is heading to
    pub fn target_level(&self) -> f64 {
        self.state.target_level.get()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Move to `level`
    ///
    /// Visible hosts animate linearly from the current level; an in-flight
    /// animation first snaps to its own target. Hidden hosts jump straight
    /// to `level`.
    pub fn set_level(&self, level: f64) {
        let state = &self.state;
        if state.host.is_showing() {
            if level != state.level.get() {
                self.animator.stop();
                state.start_level.set(state.level.get());
                state.target_level.set(level);
                tracing::debug!(from = state.level.get(), to = level, "elevation change");
                self.animator.start();
            }
        } else {
            self.animator.stop();
            state.target_level.set(level);
            state.level.set(level);
        }
    }

    /// Corner arc diameter of the shadow-casting component, in pixels
    pub fn border_radius(&self) -> u32 {
        self.border_radius.get()
    }

    pub fn set_border_radius(&self, border_radius: u32) {
        self.border_radius.set(border_radius);
    }

    /// Number of shadow bitmaps computed so far
    pub fn shadow_render_count(&self) -> u64 {
        self.shadow.borrow().render_count()
    }

    /// Paint the shadow (or flat highlight) behind the host's content
    pub fn paint(&self, surface: &mut dyn DrawSurface) {
        let host = &self.state.host;
        let (width, height) = host.size().to_pixels();
        let border_radius = self.border_radius.get();
        let level = self.level();

        if host.is_flat() {
            let fill = host.background().brighten(flat_brightness_step(level));
            surface.fill_rounded_rect(
                Rect::new(0.0, 0.0, width as f32, height as f32),
                border_radius as f32 / 2.0,
                fill,
            );
        } else {
            let bitmap = self
                .shadow
                .borrow_mut()
                .render(width, height, border_radius as f64, level);
            surface.draw_bitmap(&bitmap, Point::ZERO);
        }
    }
}

impl std::fmt::Debug for ElevationEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevationEffect")
            .field("level", &self.level())
            .field("target_level", &self.target_level())
            .field("border_radius", &self.border_radius())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    use lumen_animation::{AnimationScheduler, ManualClock};
    use lumen_core::{Color, DrawCommand, RecordingSurface, Size};

    fn setup() -> (ManualClock, AnimationScheduler, Rc<HeadlessHost>) {
        let clock = ManualClock::new();
        let scheduler = AnimationScheduler::with_clock(clock.clone());
        let host = HeadlessHost::new(Size::new(120.0, 40.0));
        (clock, scheduler, host)
    }

    #[test]
    fn test_brightness_step() {
        assert_eq!(flat_brightness_step(0.0), 0);
        assert_eq!(flat_brightness_step(1.0), 25);
        assert_eq!(flat_brightness_step(5.0), 32);
        assert_eq!(flat_brightness_step(-1.0), -25);
    }

    #[test]
    fn test_linear_interpolation() {
        let (clock, scheduler, host) = setup();
        let effect = ElevationEffect::apply_to(HostRef::new(&host), &scheduler.handle(), 1.0);
        effect.set_level(3.0);
        assert_eq!(effect.target_level(), 3.0);

        clock.advance(250);
        scheduler.pump();
        assert!((effect.level() - 2.0).abs() < 1e-12);

        clock.advance(250);
        scheduler.pump();
        scheduler.pump();
        assert_eq!(effect.level(), 3.0);
        assert!(!effect.is_animating());
    }

    #[test]
    fn test_same_level_does_nothing() {
        let (_clock, scheduler, host) = setup();
        let effect = ElevationEffect::apply_to(HostRef::new(&host), &scheduler.handle(), 2.0);
        effect.set_level(2.0);
        assert!(!effect.is_animating());
        assert_eq!(host.repaint_count(), 0);
    }

    #[test]
    fn test_hidden_host_jumps() {
        let (_clock, scheduler, host) = setup();
        host.set_showing(false);
        let effect = ElevationEffect::apply_to(HostRef::new(&host), &scheduler.handle(), 0.0);

        effect.set_level(4.0);
        assert_eq!(effect.level(), 4.0);
        assert!(!effect.is_animating());
    }

    #[test]
    fn test_redirect_snaps_to_previous_target() {
        let (clock, scheduler, host) = setup();
        let effect = ElevationEffect::apply_to(HostRef::new(&host), &scheduler.handle(), 0.0);
        effect.set_level(2.0);
        clock.advance(100);
        scheduler.pump();
        assert!(effect.level() < 2.0);

        effect.set_level(1.0);
        // stopped run settled at 2, new run heads from 2 to 1
        assert_eq!(effect.level(), 2.0);
        clock.advance(250);
        scheduler.pump();
        assert!((effect.level() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_paint_raised_blits_cached_shadow() {
        let (_clock, scheduler, host) = setup();
        let effect = ElevationEffect::apply_to(HostRef::new(&host), &scheduler.handle(), 1.0);
        effect.set_border_radius(6);

        let mut surface = RecordingSurface::new();
        effect.paint(&mut surface);
        effect.paint(&mut surface);

        assert_eq!(
            surface.commands()[0],
            DrawCommand::DrawBitmap {
                origin: Point::ZERO,
                width: 120,
                height: 40,
            }
        );
        assert_eq!(effect.shadow_render_count(), 1);
    }

    #[test]
    fn test_paint_flat_brightens_background() {
        let (_clock, scheduler, host) = setup();
        host.set_flat(true);
        host.set_background(Color::rgba8(100, 100, 100, 255));
        let effect = ElevationEffect::apply_to(HostRef::new(&host), &scheduler.handle(), 1.0);
        effect.set_border_radius(4);

        let mut surface = RecordingSurface::new();
        effect.paint(&mut surface);

        assert_eq!(
            surface.commands(),
            &[DrawCommand::FillRoundedRect {
                rect: Rect::new(0.0, 0.0, 120.0, 40.0),
                corner_radius: 2.0,
                color: Color::rgba8(125, 125, 125, 255),
            }]
        );
        assert_eq!(effect.shadow_render_count(), 0);
    }
}
