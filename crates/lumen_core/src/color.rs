//! RGBA colors
//!
//! Channels are stored as `f32` in `[0, 1]`. Widgets usually think in 8-bit
//! channels and packed ARGB words, so the conversions and the fixed-step
//! helpers (`brighten`, `apply_alpha_mask`) work in that space.

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Material cyan 500 (`#00BCD4`), the default accent
    pub const CYAN_500: Color = Color::rgb(0.0, 188.0 / 255.0, 212.0 / 255.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit channels
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create an opaque color from `0xRRGGBB`
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Create from a packed `0xAARRGGBB` word
    pub fn from_argb(argb: u32) -> Self {
        Self::rgba8(
            ((argb >> 16) & 0xFF) as u8,
            ((argb >> 8) & 0xFF) as u8,
            (argb & 0xFF) as u8,
            (argb >> 24) as u8,
        )
    }

    /// Pack into a `0xAARRGGBB` word
    pub fn to_argb(&self) -> u32 {
        let [r, g, b, a] = self.to_rgba8();
        (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// 8-bit channels, rounded and clamped
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Shift every color channel by a fixed 8-bit step, clamped to `[0, 255]`
    ///
    /// Negative steps darken. Alpha is left untouched.
    pub fn brighten(&self, step: i32) -> Color {
        let [r, g, b, _] = self.to_rgba8();
        let shift = |c: u8| (c as i32 + step).clamp(0, 255) as f32 / 255.0;
        Color {
            r: shift(r),
            g: shift(g),
            b: shift(b),
            a: self.a,
        }
    }

    /// Replace the alpha channel with the top byte of `mask`
    ///
    /// `mask` uses the packed ARGB layout, so `0x99000000` yields alpha `0x99`.
    pub fn apply_alpha_mask(&self, mask: u32) -> Color {
        Color::from_argb((self.to_argb() & 0x00FF_FFFF) | (mask & 0xFF00_0000))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
