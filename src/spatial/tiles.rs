//! Tile extraction and overlap testing
//!
//! Slides a `kernel × kernel` window over every pixel of a source image,
//! treating the image as a torus so windows near the edges wrap around.
//! Identical patches are merged and counted, which yields the occurrence
//! weights the atlas turns into prototype probabilities.

use crate::spatial::bitmap::Bitmap;

/// Deduplicated tiles with their occurrence counts
#[derive(Clone, Debug)]
pub struct TileExtractor {
    tiles: Vec<Bitmap>,
    weights: Vec<usize>,
    total_samples: usize,
}

impl TileExtractor {
    /// Extract every periodic `kernel_size × kernel_size` patch of `source`
    ///
    /// Patches are compared against the unique tiles found so far by full
    /// pixel equality, so the cost is O(pixels × unique tiles). Tiles keep the
    /// order in which they were first encountered in a row-major scan.
    pub fn extract_periodic_tiles(source: &Bitmap, kernel_size: usize) -> Self {
        let mut tiles: Vec<Bitmap> = Vec::new();
        let mut weights: Vec<usize> = Vec::new();
        let mut total_samples = 0;
        let kernel = kernel_size as i64;

        for y in 0..source.height() as i64 {
            for x in 0..source.width() as i64 {
                let tile = source.periodic_trim(x, y, x + kernel, y + kernel);

                match tiles.iter().position(|existing| *existing == tile) {
                    Some(index) => {
                        if let Some(weight) = weights.get_mut(index) {
                            *weight += 1;
                        }
                    }
                    None => {
                        tiles.push(tile);
                        weights.push(1);
                    }
                }
                total_samples += 1;
            }
        }

        Self {
            tiles,
            weights,
            total_samples,
        }
    }

    /// Unique tiles in first-seen order
    pub fn tiles(&self) -> &[Bitmap] {
        &self.tiles
    }

    /// Occurrence count per unique tile
    pub fn weights(&self) -> &[usize] {
        &self.weights
    }

    /// Number of windows scanned (the source's pixel count)
    pub const fn total_samples(&self) -> usize {
        self.total_samples
    }

    /// Consume the extractor and return `(tiles, weights, total_samples)`
    pub fn into_parts(self) -> (Vec<Bitmap>, Vec<usize>, usize) {
        (self.tiles, self.weights, self.total_samples)
    }
}

/// Test whether `b`, placed at `offset` relative to `a`, agrees with `a`
/// wherever the two overlap
///
/// Offset components are expected in `-1..=1`. The compared window is
/// `(width - |dx|) × (height - |dy|)`; channels must match exactly. An empty
/// window is vacuously consistent. Tiles of different sizes never overlap.
pub fn do_images_overlap(a: &Bitmap, b: &Bitmap, offset: [i32; 2]) -> bool {
    if a.width() != b.width() || a.height() != b.height() {
        return false;
    }

    let [dx, dy] = offset;
    let a_offset = [dx.max(0) as usize, dy.max(0) as usize];
    let b_offset = [(-dx).max(0) as usize, (-dy).max(0) as usize];

    let window_width = a.width().saturating_sub(dx.unsigned_abs() as usize);
    let window_height = a.height().saturating_sub(dy.unsigned_abs() as usize);

    for y in 0..window_height {
        for x in 0..window_width {
            let pixel_a = a.get(x + a_offset[0], y + a_offset[1]);
            let pixel_b = b.get(x + b_offset[0], y + b_offset[1]);
            match (pixel_a, pixel_b) {
                (Some(pa), Some(pb)) if pa == pb => {}
                _ => return false,
            }
        }
    }

    true
}
