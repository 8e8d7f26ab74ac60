//! Mathematical utilities for the solver

/// Entropy and weighted sampling
pub mod probability;
