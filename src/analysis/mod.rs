//! Adjacency model extraction and inspection

/// Tiles, prototypes and connections learned from a source image
pub mod atlas;
/// Summary statistics of an atlas
pub mod statistics;
