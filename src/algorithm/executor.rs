use crate::{
    algorithm::bitset::OptionSet,
    algorithm::propagation::{Propagation, remove_invalid_options},
    algorithm::selection::{Heuristic, Selection, select_cell},
    analysis::atlas::{PrototypeId, TileAtlas},
    io::configuration::{
        CONTRADICTION_COLOR, DEFAULT_OUTPUT_SIZE, DEFAULT_SEED, MAX_GRID_DIMENSION,
        MAX_PROPAGATION_ITERATIONS, MAX_SOLVE_ITERATIONS,
    },
    io::error::{Result, invalid_parameter},
    math::probability::cumulative_choice,
    spatial::bitmap::{Bitmap, Rgba},
    spatial::grid::Wave,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Grid size, seed and iteration ceilings for a solver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Output width in cells
    pub width: usize,
    /// Output height in cells
    pub height: usize,
    /// Seed for the solver's random stream
    pub seed: u64,
    /// Maximum `solve_step` calls made by `solve`
    pub max_iterations: usize,
    /// Maximum cells processed by one propagation pass
    pub max_propagation_iterations: usize,
    /// Ranking used to pick the next cell
    pub heuristic: Heuristic,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_OUTPUT_SIZE,
            height: DEFAULT_OUTPUT_SIZE,
            seed: DEFAULT_SEED,
            max_iterations: MAX_SOLVE_ITERATIONS,
            max_propagation_iterations: MAX_PROPAGATION_ITERATIONS,
            heuristic: Heuristic::Shannon,
        }
    }
}

impl SolverConfig {
    /// Check the grid dimensions
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or exceeds
    /// [`MAX_GRID_DIMENSION`].
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        Ok(())
    }
}

/// Seeded random selector for reproducible stochastic choices
pub struct RandomSelector<R = StdRng> {
    rng: R,
}

impl RandomSelector<StdRng> {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSelector<R> {
    /// Wrap an existing generator
    pub const fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Weighted random selection
    ///
    /// Returns an index into `weights` drawn from the cumulative distribution.
    /// Zero weights are never chosen unless every weight is zero, in which
    /// case the choice is uniform. Returns 0 for empty input.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        if weights.is_empty() {
            return 0;
        }
        let unit = self.rng.random::<f64>();
        cumulative_choice(weights, unit).unwrap_or_else(|| self.rng.random_range(0..weights.len()))
    }
}

/// What a single `solve_step` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to do: every cell already holds exactly one option
    Collapsed,
    /// `cell` was collapsed to `prototype` and propagation settled
    Progressed {
        /// The collapsed cell
        cell: usize,
        /// The prototype it now holds
        prototype: PrototypeId,
    },
    /// Collapsing `cell` to `prototype` led to a contradiction; the choice was
    /// undone and `prototype` excluded from the cell
    Backtracked {
        /// The cell that was restored
        cell: usize,
        /// The excluded prototype
        prototype: PrototypeId,
    },
    /// `cell` has no options left and no single-cell retry can help
    Stuck {
        /// The empty cell
        cell: usize,
    },
}

/// Summary of a `solve` run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveOutcome {
    /// Whether every cell ended with exactly one option
    pub solved: bool,
    /// Steps that collapsed or backtracked a cell
    pub steps: usize,
    /// Steps that ended in a backtrack
    pub backtracks: usize,
}

/// Wave function collapse solver over a fixed grid
///
/// Repeatedly collapses the least-entropy cell to a weighted random
/// prototype and propagates the adjacency constraints. A collapse that leads
/// to a contradiction is rolled back and the offending prototype removed from
/// that cell before the next step.
pub struct TileSolver<'a, R = StdRng> {
    atlas: &'a TileAtlas,
    wave: Wave,
    random_selector: RandomSelector<R>,
    heuristic: Heuristic,
    max_iterations: usize,
    max_propagation_iterations: usize,
    steps: usize,
    backtracks: usize,
}

impl<'a> TileSolver<'a, StdRng> {
    /// Create a solver seeded from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configured grid dimensions are invalid
    pub fn new(atlas: &'a TileAtlas, config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_rng(
            atlas,
            config.width,
            config.height,
            StdRng::seed_from_u64(config.seed),
        )
        .with_heuristic(config.heuristic)
        .with_iteration_limits(config.max_iterations, config.max_propagation_iterations))
    }
}

impl<'a, R: Rng> TileSolver<'a, R> {
    /// Create a solver drawing from an existing random generator
    ///
    /// Every cell starts with every prototype possible.
    pub fn with_rng(atlas: &'a TileAtlas, width: usize, height: usize, rng: R) -> Self {
        Self {
            atlas,
            wave: Wave::new(width, height, atlas.prototype_count()),
            random_selector: RandomSelector::from_rng(rng),
            heuristic: Heuristic::Shannon,
            max_iterations: MAX_SOLVE_ITERATIONS,
            max_propagation_iterations: MAX_PROPAGATION_ITERATIONS,
            steps: 0,
            backtracks: 0,
        }
    }

    /// Replace the cell ranking
    #[must_use]
    pub const fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Replace the solve and propagation ceilings
    #[must_use]
    pub const fn with_iteration_limits(mut self, solve: usize, propagation: usize) -> Self {
        self.max_iterations = solve;
        self.max_propagation_iterations = propagation;
        self
    }

    /// Step until collapsed, stuck, or out of iterations
    ///
    /// Never panics on failure; the wave keeps whatever state the last step
    /// produced so it can be inspected or rendered.
    pub fn solve(&mut self) -> SolveOutcome {
        self.solve_with(|_| {})
    }

    /// Like [`TileSolver::solve`], calling `on_step` after every step that
    /// collapsed or backtracked a cell
    pub fn solve_with<F>(&mut self, mut on_step: F) -> SolveOutcome
    where
        F: FnMut(&Self),
    {
        for _ in 0..self.max_iterations {
            match self.solve_step() {
                StepOutcome::Collapsed => return self.collapsed_outcome(),
                StepOutcome::Stuck { cell } => {
                    log::warn!(
                        "Cell {cell} has no options left after {} steps ({} backtracks)",
                        self.steps,
                        self.backtracks
                    );
                    return self.outcome(false);
                }
                StepOutcome::Progressed { .. } | StepOutcome::Backtracked { .. } => {
                    on_step(&*self);
                }
            }
        }

        if self.is_collapsed() {
            return self.collapsed_outcome();
        }
        log::warn!(
            "Solve stopped at the limit of {} iterations with {} of {} cells collapsed",
            self.max_iterations,
            self.collapsed_count(),
            self.wave.len()
        );
        self.outcome(false)
    }

    /// Select, collapse and propagate one cell
    pub fn solve_step(&mut self) -> StepOutcome {
        let cell = match select_cell(&self.wave, self.atlas, self.heuristic) {
            Selection::Collapsed => return StepOutcome::Collapsed,
            Selection::Contradiction(cell) => return StepOutcome::Stuck { cell },
            Selection::Candidates(candidates) => match candidates.first() {
                Some(&cell) => cell,
                None => return StepOutcome::Collapsed,
            },
        };

        let backup = self.wave.options(cell).clone();
        let Some(prototype) = self.pick_random_option(cell) else {
            return StepOutcome::Stuck { cell };
        };
        self.steps += 1;

        if self.remove_invalid_options(cell) {
            return StepOutcome::Progressed { cell, prototype };
        }

        self.backtracks += 1;
        log::debug!("Backtracking cell {cell}: prototype {prototype} causes a contradiction");
        self.wave.set_options(cell, backup);
        let _ = self.wave.options_mut(cell).remove(prototype);

        // Neighbours must not keep options only the excluded prototype supported
        if !self.wave.options(cell).is_empty() {
            let propagation = remove_invalid_options(
                &mut self.wave,
                self.atlas,
                cell,
                self.max_propagation_iterations,
            );
            // No remaining option fits some neighbour, so the cell is dead
            if let Propagation::Contradiction { .. } = propagation {
                log::debug!("Cell {cell} has no option compatible with its neighbours");
                self.wave.set_options(cell, OptionSet::new(self.wave.prototype_count()));
            }
        }

        StepOutcome::Backtracked { cell, prototype }
    }

    /// Collapse `cell` to a prototype drawn by probability from its options
    fn pick_random_option(&mut self, cell: usize) -> Option<PrototypeId> {
        let options = self.wave.options(cell).to_vec();
        let weights: Vec<f64> = options
            .iter()
            .map(|&id| self.atlas.prototype(id).map_or(0.0, |p| p.probability))
            .collect();

        let choice = self.random_selector.weighted_choice(&weights);
        let prototype = options.get(choice).copied()?;
        self.wave.options_mut(cell).collapse_to(prototype);
        Some(prototype)
    }

    /// Propagate constraints outward from `start_cell`
    ///
    /// Returns false on contradiction or when the propagation ceiling is hit;
    /// in both cases every removal made by this pass has been undone.
    pub fn remove_invalid_options(&mut self, start_cell: usize) -> bool {
        matches!(
            remove_invalid_options(
                &mut self.wave,
                self.atlas,
                start_cell,
                self.max_propagation_iterations,
            ),
            Propagation::Settled { .. }
        )
    }

    /// True iff every cell holds exactly one option
    pub fn is_collapsed(&self) -> bool {
        self.wave.is_collapsed()
    }

    /// True iff no two adjacent collapsed cells hold prototypes the atlas
    /// forbids next to each other
    ///
    /// Cells with several or no options are not checked.
    pub fn is_consistent(&self) -> bool {
        (0..self.wave.len()).all(|cell| {
            let Some(prototype) = self.wave.options(cell).single() else {
                return true;
            };
            self.wave.neighbors(cell).all(|(neighbor, direction)| {
                self.wave
                    .options(neighbor)
                    .single()
                    .is_none_or(|other| self.atlas.can_be_connected(prototype, other, direction))
            })
        })
    }

    /// Number of cells holding exactly one option
    pub fn collapsed_count(&self) -> usize {
        self.wave.iter().filter(|options| options.count() == 1).count()
    }

    /// The atlas this solver draws from
    pub const fn atlas(&self) -> &'a TileAtlas {
        self.atlas
    }

    /// Current per-cell option sets
    pub const fn wave(&self) -> &Wave {
        &self.wave
    }

    /// Steps that collapsed or backtracked a cell so far
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Steps that ended in a backtrack so far
    pub const fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// Prototype held by a collapsed cell
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn collapsed_prototype(&self, cell: usize) -> Option<PrototypeId> {
        self.wave.options(cell).single()
    }

    /// Pixels of the prototype held by a collapsed cell
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn collapsed_tile(&self, cell: usize) -> Option<&'a Bitmap> {
        self.collapsed_prototype(cell)
            .and_then(|id| self.atlas.prototype_image(id))
    }

    /// Pixels of every prototype still possible at `cell`
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn tile_options(&self, cell: usize) -> Vec<&'a Bitmap> {
        self.wave
            .options(cell)
            .iter()
            .filter_map(|id| self.atlas.prototype_image(id))
            .collect()
    }

    /// One pixel per cell: the mean centre pixel of the remaining options
    ///
    /// Cells without options are drawn in [`CONTRADICTION_COLOR`]. Works on
    /// unfinished and failed grids alike.
    pub fn render_result(&self) -> Bitmap {
        let mut image = Bitmap::new(self.wave.width(), self.wave.height());
        let mut optionless = 0;

        for cell in 0..self.wave.len() {
            let color = average_center_pixel(&self.tile_options(cell)).unwrap_or_else(|| {
                optionless += 1;
                CONTRADICTION_COLOR
            });
            image.set_with_index(cell, color);
        }

        if optionless > 0 {
            log::warn!("Rendered {optionless} cells without options");
        }
        image
    }

    fn collapsed_outcome(&self) -> SolveOutcome {
        let consistent = self.is_consistent();
        if !consistent {
            log::warn!("Every cell is collapsed but some neighbours are incompatible");
        }
        self.outcome(consistent)
    }

    fn outcome(&self, solved: bool) -> SolveOutcome {
        SolveOutcome {
            solved,
            steps: self.steps,
            backtracks: self.backtracks,
        }
    }
}

/// Channel-wise mean of the centre pixels, `None` for no images
fn average_center_pixel(images: &[&Bitmap]) -> Option<Rgba> {
    let first = images.first()?;
    let center = first.width() / 2;
    let share = 1.0 / images.len() as f64;

    let mut sum = [0.0_f64; 4];
    for image in images {
        let pixel = image.get(center, center).unwrap_or_default();
        for (total, channel) in sum.iter_mut().zip(pixel) {
            *total += f64::from(channel) * share;
        }
    }

    Some(sum.map(|channel| channel.round().clamp(0.0, 255.0) as u8))
}
