//! Ink ripple
//!
//! A circle of ink that grows from the press point. The radius eases in
//! (`delta · p²`) while the opacity follows `0.5 · sin(3 · p²)`, which rises
//! and then fades. Pressing again abandons the current ripple and starts
//! over; there is only ever one ripple per effect.

use std::cell::Cell;
use std::rc::Rc;

use lumen_animation::{AnimationListener, Animator, SchedulerHandle};
use lumen_core::{Color, DrawSurface, DrawSurfaceExt, Point};

use crate::host::HostRef;

pub const RIPPLE_DURATION_MS: u64 = 999;

/// Opacity at the start of a ripple
pub const RIPPLE_OPACITY: f64 = 0.5;

/// Center used by fixed ripples (icon-sized targets)
pub const FIXED_RIPPLE_CENTER: Point = Point::new(24.0, 24.0);

/// Where a press places the ripple
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RippleMode {
    /// At the press point, growing up to the host width
    FollowPress,
    /// Always at [`FIXED_RIPPLE_CENTER`], growing up to half the host width
    Fixed,
}

struct RippleState {
    host: HostRef,
    center: Cell<Point>,
    max_radius: Cell<u32>,
    radius: Cell<f64>,
    radius_delta: Cell<f64>,
    opacity: Cell<f64>,
}

impl AnimationListener for RippleState {
    fn on_start(&self) {
        self.radius.set(0.0);
        self.radius_delta.set(self.max_radius.get() as f64);
        self.opacity.set(RIPPLE_OPACITY);
    }

    fn on_animation(&self, percent: f64) {
        let eased = percent * percent;
        self.radius.set(self.radius_delta.get() * eased);
        self.opacity.set(RIPPLE_OPACITY * (3.0 * eased).sin());
        self.host.repaint();
    }

    fn on_stop(&self) {
        self.radius.set(0.0);
        self.host.repaint();
    }

    fn on_end(&self) {
        self.radius.set(0.0);
        self.host.repaint();
    }
}

/// The press feedback of buttons and list items
pub struct RippleEffect {
    state: Rc<RippleState>,
    animator: Animator,
    mode: RippleMode,
    color: Cell<Color>,
}

impl RippleEffect {
    fn new(host: HostRef, scheduler: &SchedulerHandle, mode: RippleMode) -> Self {
        let state = Rc::new(RippleState {
            host,
            center: Cell::new(Point::ZERO),
            max_radius: Cell::new(0),
            radius: Cell::new(0.0),
            radius_delta: Cell::new(0.0),
            opacity: Cell::new(RIPPLE_OPACITY),
        });
        let animator = Animator::new(scheduler.clone(), state.clone());
        animator.set_delay(0).set_duration(RIPPLE_DURATION_MS);

        Self {
            state,
            animator,
            mode,
            color: Cell::new(Color::WHITE),
        }
    }

    /// Ripples that start where the host was pressed
    pub fn apply_to(host: HostRef, scheduler: &SchedulerHandle) -> Self {
        Self::new(host, scheduler, RippleMode::FollowPress)
    }

    /// Ripples that always start at (24, 24), growing to half the host width
    ///
    /// The center is an absolute position sized for 48 px icon targets. It
    /// does not follow the host's size, so a smaller or larger host is not
    /// centered.
    pub fn apply_fixed_to(host: HostRef, scheduler: &SchedulerHandle) -> Self {
        Self::new(host, scheduler, RippleMode::Fixed)
    }

    /// React to a press at `point` (host coordinates)
    pub fn press(&self, point: Point) {
        let (width, _) = self.state.host.size().to_pixels();
        match self.mode {
            RippleMode::FollowPress => self.add_ripple(point, width),
            RippleMode::Fixed => self.add_ripple(FIXED_RIPPLE_CENTER, width / 2),
        }
    }

    /// Start a ripple at `point`, abandoning any ripple in flight
    pub fn add_ripple(&self, point: Point, max_radius: u32) {
        self.state.center.set(point);
        self.state.max_radius.set(max_radius);
        self.animator.start();
    }

    pub fn mode(&self) -> RippleMode {
        self.mode
    }

    pub fn is_rippling(&self) -> bool {
        self.animator.is_running()
    }

    pub fn center(&self) -> Point {
        self.state.center.get()
    }

    pub fn radius(&self) -> f64 {
        self.state.radius.get()
    }

    /// Raw opacity; may be negative late in a run
    pub fn opacity(&self) -> f64 {
        self.state.opacity.get()
    }

    pub fn color(&self) -> Color {
        self.color.get()
    }

    pub fn set_color(&self, color: Color) {
        self.color.set(color);
    }

    /// Draw the ripple, if one is running
    pub fn paint(&self, surface: &mut dyn DrawSurface) {
        if !self.is_rippling() {
            return;
        }
        let radius = self.radius().trunc();
        if radius <= 0.0 {
            return;
        }
        let alpha = self.opacity().clamp(0.0, 1.0) as f32;
        surface.fill_circle(self.center(), radius as f32, self.color().with_alpha(alpha));
    }
}

impl std::fmt::Debug for RippleEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RippleEffect")
            .field("mode", &self.mode)
            .field("rippling", &self.is_rippling())
            .field("center", &self.center())
            .field("radius", &self.radius())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    use lumen_animation::{AnimationScheduler, ManualClock};
    use lumen_core::{DrawCommand, RecordingSurface, Rect, Size};

    fn setup() -> (ManualClock, AnimationScheduler, Rc<HeadlessHost>) {
        let clock = ManualClock::new();
        let scheduler = AnimationScheduler::with_clock(clock.clone());
        let host = HeadlessHost::new(Size::new(200.0, 48.0));
        (clock, scheduler, host)
    }

    #[test]
    fn test_idle_ripple_paints_nothing() {
        let (_clock, scheduler, host) = setup();
        let ripple = RippleEffect::apply_to(HostRef::new(&host), &scheduler.handle());

        let mut surface = RecordingSurface::new();
        ripple.paint(&mut surface);
        assert!(surface.commands().is_empty());
        assert!(!ripple.is_rippling());
    }

    #[test]
    fn test_radius_eases_in() {
        let (clock, scheduler, host) = setup();
        let ripple = RippleEffect::apply_to(HostRef::new(&host), &scheduler.handle());
        ripple.press(Point::new(30.0, 20.0));
        assert_eq!(ripple.center(), Point::new(30.0, 20.0));

        let duration = RIPPLE_DURATION_MS as f64;
        clock.advance(333);
        scheduler.pump();
        let p = 333.0 / duration;
        assert!((ripple.radius() - 200.0 * p * p).abs() < 1e-9);
        assert!((ripple.opacity() - 0.5 * (3.0 * p * p).sin()).abs() < 1e-12);
        assert!(host.repaint_count() > 0);
    }

    #[test]
    fn test_ripple_resets_after_end() {
        let (clock, scheduler, host) = setup();
        let ripple = RippleEffect::apply_to(HostRef::new(&host), &scheduler.handle());
        ripple.press(Point::new(10.0, 10.0));

        clock.advance(RIPPLE_DURATION_MS);
        scheduler.pump();
        assert!(ripple.is_rippling());
        assert!((ripple.radius() - 200.0).abs() < 1e-9);

        scheduler.pump();
        assert!(!ripple.is_rippling());
        assert_eq!(ripple.radius(), 0.0);
    }

    #[test]
    fn test_fixed_mode_uses_fixed_center() {
        let (clock, scheduler, host) = setup();
        let ripple = RippleEffect::apply_fixed_to(HostRef::new(&host), &scheduler.handle());
        assert_eq!(ripple.mode(), RippleMode::Fixed);

        ripple.press(Point::new(150.0, 5.0));
        assert_eq!(ripple.center(), FIXED_RIPPLE_CENTER);

        clock.advance(RIPPLE_DURATION_MS);
        scheduler.pump();
        assert!((ripple.radius() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_center_ignores_small_host() {
        let (clock, scheduler, _) = setup();
        let host = HeadlessHost::new(Size::new(20.0, 20.0));
        let ripple = RippleEffect::apply_fixed_to(HostRef::new(&host), &scheduler.handle());

        ripple.press(Point::new(10.0, 10.0));
        assert_eq!(ripple.center(), Point::new(24.0, 24.0));

        clock.advance(RIPPLE_DURATION_MS);
        scheduler.pump();
        assert!((ripple.radius() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_paint_uses_integer_radius_and_clamped_alpha() {
        let (clock, scheduler, host) = setup();
        let ripple = RippleEffect::apply_to(HostRef::new(&host), &scheduler.handle());
        ripple.set_color(Color::RED);
        ripple.add_ripple(Point::new(50.0, 24.0), 100);

        clock.advance(500);
        scheduler.pump();
        let radius = ripple.radius().trunc() as f32;

        let mut surface = RecordingSurface::new();
        ripple.paint(&mut surface);
        match surface.commands() {
            [DrawCommand::FillOval { bounds, color }] => {
                assert_eq!(
                    *bounds,
                    Rect::from_center(Point::new(50.0, 24.0), Size::new(radius * 2.0, radius * 2.0))
                );
                assert_eq!(color.r, 1.0);
                assert!(color.a > 0.0 && color.a <= 0.5);
            }
            other => panic!("unexpected commands: {other:?}"),
        }

        // past p ≈ 1.02 the sine goes negative; painting must not
        clock.advance(530);
        scheduler.pump();
        assert!(ripple.opacity() < 0.0);
        let mut surface = RecordingSurface::new();
        ripple.paint(&mut surface);
        match surface.commands() {
            [DrawCommand::FillOval { color, .. }] => assert_eq!(color.a, 0.0),
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn test_second_press_abandons_first() {
        let (clock, scheduler, host) = setup();
        let ripple = RippleEffect::apply_to(HostRef::new(&host), &scheduler.handle());
        ripple.press(Point::new(10.0, 10.0));
        clock.advance(700);
        scheduler.pump();
        assert!(ripple.radius() > 90.0);

        ripple.press(Point::new(100.0, 30.0));
        assert_eq!(ripple.radius(), 0.0);
        assert_eq!(ripple.center(), Point::new(100.0, 30.0));

        clock.advance(100);
        scheduler.pump();
        let p = 100.0 / RIPPLE_DURATION_MS as f64;
        assert!((ripple.radius() - 200.0 * p * p).abs() < 1e-9);
    }

    #[test]
    fn test_dropped_host_is_harmless() {
        let (clock, scheduler, host) = setup();
        let ripple = RippleEffect::apply_to(HostRef::new(&host), &scheduler.handle());
        drop(host);

        ripple.press(Point::new(5.0, 5.0));
        clock.advance(100);
        scheduler.pump();
        assert_eq!(ripple.radius(), 0.0);
    }
}
