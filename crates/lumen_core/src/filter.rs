//! Image filters
//!
//! A fast Gaussian approximation built from repeated separable box blurs.
//! Box widths come from the standard "boxes for gauss" derivation, samples
//! outside the image are clamped to the nearest edge, and all arithmetic is
//! done in `f32` on premultiplied channels before a single final quantization,
//! so identical inputs always produce identical output.

use crate::bitmap::Bitmap;

/// Box widths whose successive application approximates a Gaussian of `sigma`
///
/// Every width is odd; a width of 1 is the identity.
pub fn boxes_for_gauss(sigma: f32, passes: usize) -> Vec<usize> {
    if passes == 0 {
        return Vec::new();
    }
    let sigma = sigma.max(0.0);
    let n = passes as f32;

    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;

    let wlf = wl as f32;
    let m_ideal =
        (12.0 * sigma * sigma - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round() as i64;

    (0..passes as i64)
        .map(|i| if i < m { wl as usize } else { wu as usize })
        .collect()
}

/// Blur `bitmap` in place with `passes` box blurs approximating `sigma`
pub fn gaussian_blur(bitmap: &mut Bitmap, sigma: f32, passes: usize) {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 || sigma.is_nan() || sigma <= 0.0 {
        return;
    }

    let boxes = boxes_for_gauss(sigma, passes);
    if boxes.iter().all(|&w| w <= 1) {
        return;
    }

    let (w, h) = (width as usize, height as usize);
    let mut channels: [Vec<f32>; 4] = std::array::from_fn(|_| vec![0.0; w * h]);
    for (i, pixel) in bitmap.pixels().enumerate() {
        let a = pixel[3] as f32 / 255.0;
        channels[0][i] = pixel[0] as f32 / 255.0 * a;
        channels[1][i] = pixel[1] as f32 / 255.0 * a;
        channels[2][i] = pixel[2] as f32 / 255.0 * a;
        channels[3][i] = a;
    }

    let mut scratch = vec![0.0f32; w * h];
    for channel in channels.iter_mut() {
        for &box_width in &boxes {
            let radius = (box_width - 1) / 2;
            if radius == 0 {
                continue;
            }
            box_blur_horizontal(channel, &mut scratch, w, h, radius);
            box_blur_vertical(&scratch, channel, w, h, radius);
        }
    }

    for (i, pixel) in bitmap.pixels_mut().enumerate() {
        let a = channels[3][i];
        let unpremultiply = |c: f32| if a > 0.0 { c / a } else { 0.0 };
        pixel.0 = [
            to_u8(unpremultiply(channels[0][i])),
            to_u8(unpremultiply(channels[1][i])),
            to_u8(unpremultiply(channels[2][i])),
            to_u8(a),
        ];
    }
}

fn box_blur_horizontal(src: &[f32], dst: &mut [f32], w: usize, h: usize, radius: usize) {
    let r = radius as i64;
    let last = w as i64 - 1;
    let scale = 1.0 / (2 * radius + 1) as f32;
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w as i64 {
            let mut acc = 0.0;
            for dx in -r..=r {
                acc += row[(x + dx).clamp(0, last) as usize];
            }
            dst[y * w + x as usize] = acc * scale;
        }
    }
}

fn box_blur_vertical(src: &[f32], dst: &mut [f32], w: usize, h: usize, radius: usize) {
    let r = radius as i64;
    let last = h as i64 - 1;
    let scale = 1.0 / (2 * radius + 1) as f32;
    for y in 0..h as i64 {
        for x in 0..w {
            let mut acc = 0.0;
            for dy in -r..=r {
                acc += src[(y + dy).clamp(0, last) as usize * w + x];
            }
            dst[y as usize * w + x] = acc * scale;
        }
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
