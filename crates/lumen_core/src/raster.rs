//! CPU coverage rasterization
//!
//! Shapes are evaluated as signed distance fields at pixel centers and
//! converted to a one-pixel antialiased coverage ramp, then composited
//! source-over onto straight-alpha RGBA8 bitmaps.

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::geometry::{Point, Rect};
use image::Rgba;

/// Signed distance from `p` to a rounded rectangle (negative inside)
///
/// The radius is clamped to half the smaller side.
pub fn sd_rounded_rect(p: Point, rect: Rect, radius: f32) -> f32 {
    let half_w = rect.width() * 0.5;
    let half_h = rect.height() * 0.5;
    let center = rect.center();
    let r = radius.max(0.0).min(half_w.min(half_h));

    let qx = (p.x - center.x).abs() - half_w + r;
    let qy = (p.y - center.y).abs() - half_h + r;

    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    outside + inside - r
}

/// Approximate signed distance to the ellipse inscribed in `bounds`
pub fn sd_oval(p: Point, bounds: Rect) -> f32 {
    let rx = bounds.width() * 0.5;
    let ry = bounds.height() * 0.5;
    if rx <= 0.0 || ry <= 0.0 {
        return f32::INFINITY;
    }
    let center = bounds.center();
    let nx = (p.x - center.x) / rx;
    let ny = (p.y - center.y) / ry;
    ((nx * nx + ny * ny).sqrt() - 1.0) * rx.min(ry)
}

/// Fill a rounded rectangle
pub fn fill_rounded_rect(bitmap: &mut Bitmap, rect: Rect, radius: f32, color: Color) {
    if rect.is_empty() {
        return;
    }
    fill_coverage(bitmap, rect, color, |p| sd_rounded_rect(p, rect, radius));
}

/// Fill the ellipse inscribed in `bounds`
pub fn fill_oval(bitmap: &mut Bitmap, bounds: Rect, color: Color) {
    if bounds.is_empty() {
        return;
    }
    fill_coverage(bitmap, bounds, color, |p| sd_oval(p, bounds));
}

/// Composite `src` onto `dst` with its top-left corner at `origin`
///
/// The origin is rounded to whole pixels; out-of-bounds pixels are clipped.
pub fn blit(dst: &mut Bitmap, src: &Bitmap, origin: Point) {
    let ox = origin.x.round() as i64;
    let oy = origin.y.round() as i64;
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);

    for (sx, sy, pixel) in src.enumerate_pixels() {
        let dx = ox + sx as i64;
        let dy = oy + sy as i64;
        if dx < 0 || dy < 0 || dx >= dw || dy >= dh || pixel[3] == 0 {
            continue;
        }
        let [r, g, b, a] = pixel.0;
        let color = Color::rgba8(r, g, b, a);
        blend_pixel(dst.get_pixel_mut(dx as u32, dy as u32), color, 1.0);
    }
}

/// Source-over blend `color` scaled by `coverage` into a straight-alpha pixel
pub fn blend_pixel(pixel: &mut Rgba<u8>, color: Color, coverage: f32) {
    let sa = (color.a * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }

    let [dr, dg, db, da] = pixel.0.map(|c| c as f32 / 255.0);
    let out_a = sa + da * (1.0 - sa);
    let mix = |sc: f32, dc: f32| (sc.clamp(0.0, 1.0) * sa + dc * da * (1.0 - sa)) / out_a;

    pixel.0 = [
        to_u8(mix(color.r, dr)),
        to_u8(mix(color.g, dg)),
        to_u8(mix(color.b, db)),
        to_u8(out_a),
    ];
}

fn fill_coverage<F>(bitmap: &mut Bitmap, bounds: Rect, color: Color, distance: F)
where
    F: Fn(Point) -> f32,
{
    let Some((x0, y0, x1, y1)) = pixel_span(bitmap, bounds) else {
        return;
    };

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let coverage = (0.5 - distance(p)).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_pixel(bitmap.get_pixel_mut(x, y), color, coverage);
            }
        }
    }
}

/// Pixel range touched by `bounds`, clipped to the bitmap
fn pixel_span(bitmap: &Bitmap, bounds: Rect) -> Option<(u32, u32, u32, u32)> {
    let x0 = bounds.x().floor().max(0.0);
    let y0 = bounds.y().floor().max(0.0);
    let x1 = bounds.right().ceil().min(bitmap.width() as f32);
    let y1 = bounds.bottom().ceil().min(bitmap.height() as f32);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
