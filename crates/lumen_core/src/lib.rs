//! Lumen Core
//!
//! Foundational types shared by the Lumen effects engine:
//!
//! - **Geometry**: `Point`, `Size`, `Rect`
//! - **Color**: RGBA colors with the 8-bit helpers widgets rely on
//! - **Bitmap**: RGBA8 pixel buffers plus PNG I/O
//! - **Draw Surface**: the capability trait effects paint through
//! - **Raster / Filter**: CPU coverage rasterization and box blur
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{Color, DrawSurfaceExt, Point, Rect, RecordingSurface};
//!
//! let mut surface = RecordingSurface::new();
//! surface.fill_rect(Rect::new(0.0, 0.0, 100.0, 40.0), Color::WHITE);
//! surface.fill_circle(Point::new(50.0, 20.0), 10.0, Color::BLACK.with_alpha(0.5));
//!
//! assert_eq!(surface.commands().len(), 2);
//! ```

pub mod bitmap;
pub mod color;
pub mod draw;
pub mod filter;
pub mod geometry;
pub mod raster;

pub use bitmap::{load_png, save_png, Bitmap, BitmapError};
pub use color::Color;
pub use draw::{
    BitmapSurface, DrawCommand, DrawSurface, DrawSurfaceExt, FontMetrics, RecordingSurface,
    TextRun, TextStyle,
};
pub use filter::{boxes_for_gauss, gaussian_blur};
pub use geometry::{Point, Rect, Size};
