//! Spatial data structures
//!
//! Pixel bitmaps, compass directions, tile extraction and the wave grid.

/// RGBA rasters with periodic access and symmetry transforms
pub mod bitmap;
/// Eight-way directions and per-direction maps
pub mod direction;
/// Per-cell option sets of the output grid
pub mod grid;
/// Periodic tile extraction and overlap tests
pub mod tiles;

pub use grid::Wave;
