//! Material drop shadows
//!
//! A shadow is a black rounded rectangle, inset from the component bounds
//! and blurred. Both its opacity and its blur radius follow a logistic curve
//! of the elevation level, saturating at level 2.

use std::rc::Rc;

use lumen_core::{filter, raster, Bitmap, Color, Size};

/// Space between the component bounds and the shadow-casting shape
pub const OFFSET_TOP: u32 = 2;
pub const OFFSET_LEFT: u32 = 2;
pub const OFFSET_BOTTOM: u32 = 2;
pub const OFFSET_RIGHT: u32 = 2;

/// Border radius used by [`render_shadow_default`]
pub const DEFAULT_BORDER_RADIUS: f64 = 3.0;

/// Highest level the shadow curve distinguishes
pub const MAX_SHADOW_LEVEL: f64 = 2.0;

const BLUR_PASSES: usize = 3;

/// Render the shadow for a `width × height` component
///
/// `level` is clamped to `[0, 2]`. `border_radius` is the corner arc
/// diameter, as widgets specify it.
pub fn render_shadow(width: u32, height: u32, level: f64, border_radius: f64) -> Bitmap {
    let level = if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, MAX_SHADOW_LEVEL)
    };

    let logistic = 1.0 + (-2.0 * level).exp();
    let opacity = (2.0 / logistic - 1.0) as f32;
    let blur = (4.0 / logistic - 2.0) as f32;

    let mut bitmap = Bitmap::new(width, height);
    let shape = Size::new(width as f32, height as f32).to_rect().inset_sides(
        OFFSET_LEFT as f32,
        OFFSET_TOP as f32,
        OFFSET_RIGHT as f32,
        OFFSET_BOTTOM as f32,
    );
    raster::fill_rounded_rect(
        &mut bitmap,
        shape,
        (border_radius / 2.0) as f32,
        Color::BLACK.with_alpha(opacity),
    );
    filter::gaussian_blur(&mut bitmap, blur, BLUR_PASSES);

    bitmap
}

/// [`render_shadow`] with the default border radius
pub fn render_shadow_default(width: u32, height: u32, level: f64) -> Bitmap {
    render_shadow(width, height, level, DEFAULT_BORDER_RADIUS)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ShadowKey {
    width: u32,
    height: u32,
    border_radius: f64,
    level: f64,
}

/// A shadow renderer that remembers its last result
///
/// Each shadow-casting component owns one. Repeated calls with unchanged
/// parameters return the same bitmap; any change recomputes and replaces it.
#[derive(Debug, Default)]
pub struct MaterialShadow {
    cached: Option<(ShadowKey, Rc<Bitmap>)>,
    render_count: u64,
}

impl MaterialShadow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, width: u32, height: u32, border_radius: f64, level: f64) -> Rc<Bitmap> {
        let key = ShadowKey {
            width,
            height,
            border_radius,
            level,
        };

        if let Some((cached_key, bitmap)) = &self.cached {
            if *cached_key == key {
                return bitmap.clone();
            }
        }

        tracing::debug!(width, height, border_radius, level, "shadow cache miss");
        let bitmap = Rc::new(render_shadow(width, height, level, border_radius));
        self.render_count += 1;
        self.cached = Some((key, bitmap.clone()));
        bitmap
    }

    /// Number of times the shadow was actually recomputed
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Drop the cached bitmap
    pub fn clear(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::bitmap::{is_transparent, max_alpha};

    #[test]
    fn test_level_zero_is_transparent() {
        let bitmap = render_shadow(100, 100, 0.0, 3.0);
        assert_eq!(bitmap.dimensions(), (100, 100));
        assert!(is_transparent(&bitmap));
    }

    #[test]
    fn test_level_is_clamped() {
        let low = render_shadow(40, 30, 0.0, 6.0);
        assert_eq!(render_shadow(40, 30, -3.5, 6.0), low);

        let high = render_shadow(40, 30, 2.0, 6.0);
        assert_eq!(render_shadow(40, 30, 2.0001, 6.0), high);
        assert_eq!(render_shadow(40, 30, 5.0, 6.0), high);
    }

    #[test]
    fn test_opacity_grows_with_level() {
        let one = max_alpha(&render_shadow_default(60, 60, 1.0));
        let two = max_alpha(&render_shadow_default(60, 60, 2.0));
        assert!(one > 0);
        assert!(two > one);
    }

    #[test]
    fn test_shadow_is_inset() {
        let bitmap = render_shadow(50, 50, 1.0, 0.0);
        let center = bitmap.get_pixel(25, 25)[3];
        let corner = bitmap.get_pixel(0, 0)[3];
        assert!(center > corner);
    }

    #[test]
    fn test_degenerate_sizes() {
        let empty = render_shadow(0, 0, 1.0, 3.0);
        assert_eq!(empty.dimensions(), (0, 0));

        // smaller than the insets: nothing to fill
        let tiny = render_shadow(3, 3, 2.0, 3.0);
        assert!(is_transparent(&tiny));
    }

    #[test]
    fn test_cache_hit_returns_same_bitmap() {
        let mut shadow = MaterialShadow::new();
        let first = shadow.render(80, 40, 4.0, 1.0);
        let second = shadow.render(80, 40, 4.0, 1.0);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(shadow.render_count(), 1);
    }

    #[test]
    fn test_cache_miss_on_any_change() {
        let mut shadow = MaterialShadow::new();
        let base = shadow.render(80, 40, 4.0, 1.0);

        for (w, h, r, l) in [(81, 40, 4.0, 1.0), (81, 41, 4.0, 1.0), (81, 41, 5.0, 1.0), (81, 41, 5.0, 1.5)] {
            let next = shadow.render(w, h, r, l);
            assert!(!Rc::ptr_eq(&base, &next));
        }
        assert_eq!(shadow.render_count(), 5);

        // single slot: going back recomputes
        shadow.render(80, 40, 4.0, 1.0);
        assert_eq!(shadow.render_count(), 6);
    }

    #[test]
    fn test_clear_forces_recompute() {
        let mut shadow = MaterialShadow::new();
        shadow.render(20, 20, 3.0, 1.0);
        shadow.clear();
        shadow.render(20, 20, 3.0, 1.0);
        assert_eq!(shadow.render_count(), 2);
    }
}
