//! File handling, user interface and error reporting

/// Command-line parsing and batch processing
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// PNG loading and export
pub mod image;
/// `log` backend aware of progress bars
pub mod logging;
/// Progress bars for batch solving
pub mod progress;
