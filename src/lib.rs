//! Wave function collapse over an overlapping tile model
//!
//! A [`TileAtlas`](analysis::atlas::TileAtlas) learns square tiles and their
//! allowed neighbours from a periodic source image. A
//! [`TileSolver`](algorithm::executor::TileSolver) then fills an output grid
//! so every pair of adjacent cells is allowed, collapsing the least uncertain
//! cell first and backtracking out of contradictions.

#![forbid(unsafe_code)]

/// Cell selection, constraint propagation and the solver loop
pub mod algorithm;
/// Adjacency model construction and statistics
pub mod analysis;
/// Input/output operations, logging and error handling
pub mod io;
/// Probability helpers
pub mod math;
/// Bitmaps, directions, tiles and the wave grid
pub mod spatial;

pub use io::error::{AlgorithmError, Result};
