//! Draw Surface - the painting contract between effects and their hosts
//!
//! Effects never own pixels. A host widget hands them a `DrawSurface` at the
//! right point of its own paint sequence and the effect issues a handful of
//! primitive operations on it: rounded rectangles, ovals, bitmap blits and
//! text.
//!
//! Two implementations ship with the core:
//!
//! - [`RecordingSurface`] records commands for inspection and replay
//! - [`BitmapSurface`] rasterizes shapes and bitmaps on the CPU
//!
//! # Example
//!
//! ```ignore
//! fn paint(surface: &mut dyn DrawSurface) {
//!     surface.fill_rounded_rect(Rect::new(0.0, 0.0, 100.0, 36.0), 2.0, Color::WHITE);
//!     surface.draw_text("OK", Point::new(40.0, 24.0), &TextStyle::new(14.0));
//! }
//! ```

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use crate::raster;

// ─────────────────────────────────────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────────────────────────────────────

/// Text style configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family name
    pub family: String,
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "Roboto".to_string(),
            size: 14.0,
            color: Color::BLACK,
        }
    }
}

impl TextStyle {
    /// Create a new text style with font size
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Set text color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set font family
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }
}

/// Vertical font metrics, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the tallest glyphs
    pub ascent: f32,
    /// Distance from the baseline to the bottom of descenders
    pub descent: f32,
}

impl FontMetrics {
    /// Metrics scaled from Roboto's vertical proportions
    ///
    /// Used by surfaces that have no font backend of their own.
    pub fn approximate(size: f32) -> Self {
        Self {
            ascent: size * 0.9277,
            descent: size * 0.2441,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Surface Trait
// ─────────────────────────────────────────────────────────────────────────────

/// The drawing capability a host provides to effects
pub trait DrawSurface {
    /// Fill a rectangle with rounded corners (`corner_radius` = 0 for square)
    fn fill_rounded_rect(&mut self, rect: Rect, corner_radius: f32, color: Color);

    /// Fill the ellipse inscribed in `bounds`
    fn fill_oval(&mut self, bounds: Rect, color: Color);

    /// Composite a bitmap with its top-left corner at `origin`
    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point);

    /// Draw text with its baseline starting at `origin`
    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle);

    /// Metrics for the font described by `style`
    fn font_metrics(&self, style: &TextStyle) -> FontMetrics;
}

/// Convenience shapes built on top of [`DrawSurface`]
pub trait DrawSurfaceExt: DrawSurface {
    /// Fill a square-cornered rectangle
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_rounded_rect(rect, 0.0, color);
    }

    /// Fill a circle
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        let diameter = radius * 2.0;
        self.fill_oval(
            Rect::from_center(center, Size::new(diameter, diameter)),
            color,
        );
    }
}

// Blanket implementation for all DrawSurface implementers
impl<T: DrawSurface + ?Sized> DrawSurfaceExt for T {}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Surface
// ─────────────────────────────────────────────────────────────────────────────

/// A draw command that was issued against a [`RecordingSurface`]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRoundedRect {
        rect: Rect,
        corner_radius: f32,
        color: Color,
    },
    FillOval {
        bounds: Rect,
        color: Color,
    },
    DrawBitmap {
        origin: Point,
        width: u32,
        height: u32,
    },
    DrawText {
        text: String,
        origin: Point,
        style: TextStyle,
    },
}

/// A surface that records commands instead of drawing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Clear all recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rounded_rect(&mut self, rect: Rect, corner_radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillRoundedRect {
            rect,
            corner_radius,
            color,
        });
    }

    fn fill_oval(&mut self, bounds: Rect, color: Color) {
        self.commands.push(DrawCommand::FillOval { bounds, color });
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point) {
        self.commands.push(DrawCommand::DrawBitmap {
            origin,
            width: bitmap.width(),
            height: bitmap.height(),
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::DrawText {
            text: text.to_string(),
            origin,
            style: style.clone(),
        });
    }

    fn font_metrics(&self, style: &TextStyle) -> FontMetrics {
        FontMetrics::approximate(style.size)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bitmap Surface
// ─────────────────────────────────────────────────────────────────────────────

/// A text run collected by [`BitmapSurface`]
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub style: TextStyle,
}

/// A CPU surface that rasterizes into an owned bitmap
///
/// Shapes and bitmaps are composited immediately. There is no glyph
/// rasterizer here, so text is collected as [`TextRun`]s for the caller to
/// render or inspect.
pub struct BitmapSurface {
    bitmap: Bitmap,
    text_runs: Vec<TextRun>,
}

impl BitmapSurface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bitmap: Bitmap::new(width, height),
            text_runs: Vec::new(),
        }
    }

    /// Create a surface pre-filled with `background`
    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        let mut surface = Self::new(width, height);
        surface.clear(background);
        surface
    }

    /// Reset every pixel to `color` and drop collected text
    pub fn clear(&mut self, color: Color) {
        let pixel = image::Rgba(color.to_rgba8());
        for p in self.bitmap.pixels_mut() {
            *p = pixel;
        }
        self.text_runs.clear();
    }

    pub fn size(&self) -> Size {
        Size::new(self.bitmap.width() as f32, self.bitmap.height() as f32)
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }
}

impl DrawSurface for BitmapSurface {
    fn fill_rounded_rect(&mut self, rect: Rect, corner_radius: f32, color: Color) {
        raster::fill_rounded_rect(&mut self.bitmap, rect, corner_radius, color);
    }

    fn fill_oval(&mut self, bounds: Rect, color: Color) {
        raster::fill_oval(&mut self.bitmap, bounds, color);
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point) {
        raster::blit(&mut self.bitmap, bitmap, origin);
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        tracing::trace!("collecting text run {:?} at {:?}", text, origin);
        self.text_runs.push(TextRun {
            text: text.to_string(),
            origin,
            style: style.clone(),
        });
    }

    fn font_metrics(&self, style: &TextStyle) -> FontMetrics {
        FontMetrics::approximate(style.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface() {
        let mut surface = RecordingSurface::new();

        surface.fill_rounded_rect(Rect::new(0.0, 0.0, 100.0, 50.0), 8.0, Color::BLUE);
        surface.draw_text("Hello", Point::new(10.0, 30.0), &TextStyle::default());
        surface.draw_bitmap(&Bitmap::new(4, 3), Point::ZERO);

        assert_eq!(surface.commands().len(), 3);
        assert_eq!(
            surface.commands()[2],
            DrawCommand::DrawBitmap {
                origin: Point::ZERO,
                width: 4,
                height: 3
            }
        );

        let taken = surface.take_commands();
        assert_eq!(taken.len(), 3);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_fill_circle_uses_bounding_box() {
        let mut surface = RecordingSurface::new();
        surface.fill_circle(Point::new(24.0, 24.0), 10.0, Color::WHITE);

        assert_eq!(
            surface.commands(),
            &[DrawCommand::FillOval {
                bounds: Rect::new(14.0, 14.0, 20.0, 20.0),
                color: Color::WHITE,
            }]
        );
    }

    #[test]
    fn test_text_style() {
        let style = TextStyle::new(16.0)
            .with_color(Color::WHITE)
            .with_family("Arial");

        assert_eq!(style.size, 16.0);
        assert_eq!(style.color, Color::WHITE);
        assert_eq!(style.family, "Arial");
    }

    #[test]
    fn test_approximate_metrics_scale_with_size() {
        let small = FontMetrics::approximate(12.0);
        let large = FontMetrics::approximate(16.0);
        assert!(large.ascent > small.ascent);
        assert!((large.line_height() - 16.0 * (0.9277 + 0.2441)).abs() < 1e-4);
    }

    #[test]
    fn test_bitmap_surface_rasterizes() {
        let mut surface = BitmapSurface::with_background(10, 10, Color::WHITE);
        surface.fill_rect(Rect::new(0.0, 0.0, 5.0, 10.0), Color::BLACK);
        surface.draw_text("label", Point::new(0.0, 9.0), &TextStyle::new(12.0));

        assert_eq!(surface.bitmap().get_pixel(2, 5).0, [0, 0, 0, 255]);
        assert_eq!(surface.bitmap().get_pixel(7, 5).0, [255, 255, 255, 255]);
        assert_eq!(surface.text_runs().len(), 1);
        assert_eq!(surface.size(), Size::new(10.0, 10.0));
    }
}
