//! PNG loading and export for bitmaps

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::bitmap::Bitmap;
use image::{ImageBuffer, Rgba};
use std::path::Path;

/// Load any image the `image` crate understands as an RGBA bitmap
///
/// # Errors
///
/// Returns an error if:
/// - The file at the given path cannot be opened or read
/// - The file is not a valid image format
/// - The image has no pixels
pub fn load_bitmap<P: AsRef<Path>>(path: P) -> Result<Bitmap> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| AlgorithmError::ImageLoad {
        path: path_buf.clone(),
        source: e,
    })?;
    let rgba_img = img.to_rgba8();

    let (width, height) = (rgba_img.width() as usize, rgba_img.height() as usize);
    if width == 0 || height == 0 {
        return Err(AlgorithmError::InvalidSourceData {
            reason: format!("{} has no pixels", path_buf.display()),
        });
    }

    let pixels = rgba_img.pixels().map(|pixel| pixel.0).collect();
    Bitmap::from_pixels(width, height, pixels).ok_or_else(|| AlgorithmError::InvalidSourceData {
        reason: format!("{} has an unexpected pixel count", path_buf.display()),
    })
}

/// Save a bitmap as PNG, creating the parent directory if needed
///
/// # Errors
///
/// Returns an error if:
/// - The bitmap is empty
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_bitmap_as_png<P: AsRef<Path>>(bitmap: &Bitmap, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    if bitmap.is_empty() {
        return Err(AlgorithmError::InvalidSourceData {
            reason: "Cannot export an empty bitmap".to_string(),
        });
    }

    let img = ImageBuffer::from_fn(bitmap.width() as u32, bitmap.height() as u32, |x, y| {
        Rgba(bitmap.get(x as usize, y as usize).unwrap_or_default())
    });

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
