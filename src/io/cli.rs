//! Command-line interface for batch-solving PNG sources

use crate::algorithm::executor::{SolveOutcome, SolverConfig, TileSolver};
use crate::analysis::atlas::{AtlasConfig, TileAtlas};
use crate::analysis::statistics::AtlasSummary;
use crate::io::configuration::{
    DEFAULT_KERNEL_SIZE, DEFAULT_OUTPUT_SIZE, DEFAULT_SEED, MAX_SOLVE_ITERATIONS, OUTPUT_SUFFIX,
    PROGRESS_REFRESH_STEPS,
};
use crate::io::error::{Result, io_error};
use crate::io::image::{export_bitmap_as_png, load_bitmap};
use crate::io::logging::ProgressLogger;
use crate::io::progress::ProgressManager;
use clap::Parser;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "tilecollapse")]
#[command(
    version,
    about = "Generate images that locally resemble a source image using wave function collapse"
)]
/// Command-line arguments for the generator
// Independent on/off switches read naturally as flags
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Tile edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_KERNEL_SIZE)]
    pub kernel: usize,

    /// Output width in pixels (implies square if height not specified)
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Output height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Maximum solver steps before giving up
    #[arg(short, long, default_value_t = MAX_SOLVE_ITERATIONS)]
    pub iterations: usize,

    /// Add rotated tile variants (90°, 180°, 270°)
    #[arg(short = 'r', long)]
    pub rotate: bool,

    /// Add mirrored tile variants
    #[arg(short = 'm', long)]
    pub mirror: bool,

    /// Suppress progress bars and informational output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Log solver details; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Output grid size as `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w),
            (None, Some(h)) => (h, h),
            (None, None) => (DEFAULT_OUTPUT_SIZE, DEFAULT_OUTPUT_SIZE),
        }
    }

    /// Most verbose log level to emit
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Atlas options selected on the command line
    pub const fn atlas_config(&self) -> AtlasConfig {
        AtlasConfig {
            kernel_size: self.kernel,
            include_rotations: self.rotate,
            include_reflections: self.mirror,
        }
    }

    /// Solver options selected on the command line
    pub fn solver_config(&self) -> SolverConfig {
        let (width, height) = self.dimensions();
        SolverConfig {
            width,
            height,
            seed: self.seed,
            max_iterations: self.iterations,
            ..SolverConfig::default()
        }
    }
}

/// What happened to one input file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    /// Source image
    pub input: PathBuf,
    /// Written result image
    pub output: PathBuf,
    /// Solver summary
    pub outcome: SolveOutcome,
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Route `log` output through this processor's progress display
    ///
    /// # Errors
    ///
    /// Returns an error if a global logger was already installed
    pub fn install_logger(&self) -> Result<()> {
        let output = self
            .progress_manager
            .as_ref()
            .map(|pm| pm.multi_progress().clone());
        ProgressLogger::new(self.cli.log_level(), output).install()
    }

    /// Process files according to CLI arguments
    ///
    /// A grid the solver cannot complete is still rendered and exported; it
    /// shows up as an unsolved [`FileReport`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, atlas construction, or any
    /// image load or export fails
    pub fn process(&mut self) -> Result<Vec<FileReport>> {
        let files = self.collect_files()?;
        let mut reports = Vec::with_capacity(files.len());

        if files.is_empty() {
            return Ok(reports);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            reports.push(self.process_file(file, index)?);
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(reports)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if !is_png(&self.cli.target) {
                return Err(io_error("Target file must be a PNG image"));
            }
            Ok(self
                .should_process_file(&self.cli.target)
                .then(|| self.cli.target.clone())
                .into_iter()
                .collect())
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if is_png(&path) && !is_output(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(io_error("Target must be a PNG file or directory"))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let exists = Self::get_output_path(input_path).exists();
        if exists {
            log::info!("Skipping: {} (output exists)", input_path.display());
        }
        !exists
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<FileReport> {
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);

        let source = load_bitmap(input_path)?;
        let atlas = TileAtlas::from_source_image(&source, &self.cli.atlas_config())?;
        log::info!(
            "{}: {}",
            input_path.display(),
            AtlasSummary::from_atlas(&atlas)
        );

        let config = self.cli.solver_config();
        let mut solver = TileSolver::new(&atlas, &config)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, config.width * config.height);
        }

        let progress_manager = &mut self.progress_manager;
        let outcome = solver.solve_with(|state| {
            if state.steps() % PROGRESS_REFRESH_STEPS != 0 {
                return;
            }
            if let Some(pm) = progress_manager.as_mut() {
                pm.update_cells(index, state.collapsed_count(), state.backtracks());
            }
        });

        if outcome.solved {
            log::info!(
                "{}: solved in {} steps ({} backtracks, {:.2?})",
                input_path.display(),
                outcome.steps,
                outcome.backtracks,
                start_time.elapsed()
            );
        } else {
            log::warn!(
                "{}: no complete solution after {} steps, writing partial result",
                input_path.display(),
                outcome.steps
            );
        }

        export_bitmap_as_png(&solver.render_result(), &output_path)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, outcome.solved);
        }

        Ok(FileReport {
            input: input_path.to_path_buf(),
            output: output_path,
            outcome,
        })
    }

    /// Result path for a source image: `<stem>_result.png` beside it
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{}.png", stem.to_string_lossy(), OUTPUT_SUFFIX);

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

// Results written into a source directory are not sources themselves
fn is_output(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
}
