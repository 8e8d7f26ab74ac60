//! Solver constants and runtime configuration defaults

// Ceilings stand in for "more steps than a legitimate solve ever needs"
/// Maximum `solve_step` calls before `solve` reports failure
pub const MAX_SOLVE_ITERATIONS: usize = 10_000_000;

/// Maximum cells popped by a single propagation pass before it is rolled back
pub const MAX_PROPAGATION_ITERATIONS: usize = 10_000_000;

/// Colour written for cells with no remaining options
pub const CONTRADICTION_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Edge length of extracted tiles in pixels
pub const DEFAULT_KERNEL_SIZE: usize = 3;

/// Default output width and height in cells
pub const DEFAULT_OUTPUT_SIZE: usize = 32;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

/// Cells between progress bar refreshes while solving
pub const PROGRESS_REFRESH_STEPS: usize = 64;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
