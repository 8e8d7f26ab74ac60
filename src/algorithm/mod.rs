/// Bitset of prototype options per cell
pub mod bitset;
/// Solver loop with backtracking and rendering
pub mod executor;
/// Constraint propagation with rollback
pub mod propagation;
/// Entropy-based cell selection
pub mod selection;
