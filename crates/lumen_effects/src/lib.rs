//! Lumen Effects
//!
//! Material-style visual effects driven by [`lumen_animation`] animators:
//!
//! - [`RippleEffect`]: ink ripple from a press point
//! - [`ElevationEffect`]: animated lift, painted as a cached drop shadow
//! - [`MaterialLine`]: focus underline of text inputs
//! - [`MaterialFloatingLabel`]: hint label that floats up on focus
//! - [`MaterialShadow`]: blurred shadow bitmaps with a one-entry cache
//!
//! Each effect is owned by its widget, holds a weak [`HostRef`] back to it,
//! and paints through a [`lumen_core::DrawSurface`].
//!
//! # Example
//!
//! ```rust
//! use lumen_animation::{AnimationScheduler, ManualClock};
//! use lumen_core::{RecordingSurface, Size};
//! use lumen_effects::{ElevationEffect, HeadlessHost, HostRef};
//!
//! let clock = ManualClock::new();
//! let scheduler = AnimationScheduler::with_clock(clock.clone());
//! let button = HeadlessHost::new(Size::new(120.0, 40.0));
//!
//! let elevation = ElevationEffect::apply_to(HostRef::new(&button), &scheduler.handle(), 0.0);
//! elevation.set_level(2.0);
//!
//! clock.advance(500);
//! scheduler.pump();
//! scheduler.pump();
//! assert_eq!(elevation.level(), 2.0);
//!
//! let mut surface = RecordingSurface::new();
//! elevation.paint(&mut surface);
//! ```

pub mod elevation;
pub mod floating_label;
pub mod host;
pub mod line;
pub mod ripple;
pub mod shadow;

pub use elevation::{flat_brightness_step, ElevationEffect};
pub use floating_label::MaterialFloatingLabel;
pub use host::{EffectHost, HeadlessHost, HostRef};
pub use line::MaterialLine;
pub use ripple::{RippleEffect, RippleMode};
pub use shadow::{render_shadow, render_shadow_default, MaterialShadow};
