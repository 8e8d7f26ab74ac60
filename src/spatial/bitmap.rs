//! RGBA pixel grids with periodic sub-region extraction
//!
//! Source images, extracted tiles and rendered results all share this
//! representation. Pixels are stored as `[row, col]` so iteration order is
//! row-major, matching the solver's cell numbering.

use ndarray::Array2;

/// An RGBA colour with 8 bits per channel
pub type Rgba = [u8; 4];

/// Owned RGBA raster
///
/// Two bitmaps compare equal exactly when their dimensions and every
/// channel of every pixel match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pixels: Array2<Rgba>,
}

impl Bitmap {
    /// Create a fully transparent bitmap
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), [0, 0, 0, 0]),
        }
    }

    /// Create a bitmap by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Rgba,
    {
        Self {
            pixels: Array2::from_shape_fn((height, width), |(y, x)| f(x, y)),
        }
    }

    /// Build a bitmap from row-major pixel data
    ///
    /// Returns `None` when `pixels.len()` differs from `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgba>) -> Option<Self> {
        Array2::from_shape_vec((height, width), pixels)
            .ok()
            .map(|pixels| Self { pixels })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Test if the bitmap holds no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Read the pixel at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        self.pixels.get([y, x]).copied()
    }

    /// Write the pixel at `(x, y)`; out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        if let Some(pixel) = self.pixels.get_mut([y, x]) {
            *pixel = color;
        }
    }

    /// Read a pixel by its row-major index
    pub fn get_with_index(&self, index: usize) -> Option<Rgba> {
        let width = self.width();
        if width == 0 {
            return None;
        }
        self.get(index % width, index / width)
    }

    /// Write a pixel by its row-major index; out-of-range writes are ignored
    pub fn set_with_index(&mut self, index: usize, color: Rgba) {
        let width = self.width();
        if width > 0 {
            self.set(index % width, index / width, color);
        }
    }

    /// Read a pixel treating the bitmap as a torus
    ///
    /// Returns `None` only for an empty bitmap.
    pub fn get_periodic(&self, x: i64, y: i64) -> Option<Rgba> {
        if self.is_empty() {
            return None;
        }
        let wrapped_x = x.rem_euclid(self.width() as i64) as usize;
        let wrapped_y = y.rem_euclid(self.height() as i64) as usize;
        self.get(wrapped_x, wrapped_y)
    }

    /// Cut out the region `[x0, x1) × [y0, y1)`, wrapping around the edges
    ///
    /// Coordinates beyond the bitmap continue on the opposite side, so every
    /// region of a non-empty bitmap is well defined. An empty bitmap yields an
    /// empty region of the requested size filled with transparent pixels.
    pub fn periodic_trim(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        let width = (x1 - x0).max(0) as usize;
        let height = (y1 - y0).max(0) as usize;
        Self::from_fn(width, height, |x, y| {
            self.get_periodic(x0 + x as i64, y0 + y as i64)
                .unwrap_or_default()
        })
    }

    /// Rotate a quarter turn clockwise
    #[must_use]
    pub fn rotated_90(&self) -> Self {
        let old_height = self.height();
        Self::from_fn(old_height, self.width(), |x, y| {
            self.get(y, old_height - 1 - x).unwrap_or_default()
        })
    }

    /// Rotate clockwise by `quarter_turns` quarter turns
    #[must_use]
    pub fn rotated(&self, quarter_turns: u8) -> Self {
        (0..quarter_turns % 4).fold(self.clone(), |image, _| image.rotated_90())
    }

    /// Mirror along the vertical axis
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let width = self.width();
        Self::from_fn(width, self.height(), |x, y| {
            self.get(width - 1 - x, y).unwrap_or_default()
        })
    }

    /// Iterate pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = &Rgba> + '_ {
        self.pixels.iter()
    }
}
