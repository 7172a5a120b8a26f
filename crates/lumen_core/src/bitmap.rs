//! RGBA8 bitmaps
//!
//! Bitmaps are plain `image::RgbaImage` buffers with straight (non
//! premultiplied) alpha. This module adds the PNG helpers and a couple of
//! inspection utilities used by the shadow renderer and the visual tests.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// An RGBA8 pixel buffer
pub type Bitmap = image::RgbaImage;

/// Errors from reading or writing bitmap files
#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create directory for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write a bitmap as PNG, creating parent directories as needed
pub fn save_png(bitmap: &Bitmap, path: impl AsRef<Path>) -> Result<(), BitmapError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| BitmapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    bitmap
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| BitmapError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        "saved {}x{} bitmap to {}",
        bitmap.width(),
        bitmap.height(),
        path.display()
    );
    Ok(())
}

/// Read a PNG into an RGBA8 bitmap
pub fn load_png(path: impl AsRef<Path>) -> Result<Bitmap, BitmapError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| BitmapError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Largest alpha value in the bitmap (0 for an empty bitmap)
pub fn max_alpha(bitmap: &Bitmap) -> u8 {
    bitmap.pixels().map(|p| p[3]).max().unwrap_or(0)
}

/// True when no pixel has any coverage
pub fn is_transparent(bitmap: &Bitmap) -> bool {
    max_alpha(bitmap) == 0
}
