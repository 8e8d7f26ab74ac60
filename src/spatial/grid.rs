//! The wave: one option set per output cell
//!
//! Cells are numbered row-major, `cell = y * width + x`. The grid never wraps;
//! cells on the border simply have fewer than eight neighbours.

use ndarray::Array2;

use crate::algorithm::bitset::OptionSet;
use crate::spatial::direction::Direction;

/// Fixed-size grid of per-cell candidate sets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wave {
    cells: Array2<OptionSet>,
    prototype_count: usize,
}

impl Wave {
    /// Create a `width × height` wave with every prototype possible everywhere
    pub fn new(width: usize, height: usize, prototype_count: usize) -> Self {
        Self {
            cells: Array2::from_elem((height, width), OptionSet::all(prototype_count)),
            prototype_count,
        }
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Test if the wave has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of prototypes each cell's set can hold
    pub const fn prototype_count(&self) -> usize {
        self.prototype_count
    }

    /// Cell index of `(x, y)`, if inside the grid
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width() && y < self.height()).then(|| y * self.width() + x)
    }

    /// `[x, y]` coordinates of a cell index
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn coordinates(&self, cell: usize) -> [usize; 2] {
        assert!(
            cell < self.len(),
            "cell {cell} out of range for {}x{} wave",
            self.width(),
            self.height()
        );
        [cell % self.width(), cell / self.width()]
    }

    /// Options still possible at `cell`
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    #[allow(clippy::indexing_slicing)]
    pub fn options(&self, cell: usize) -> &OptionSet {
        let [x, y] = self.coordinates(cell);
        &self.cells[[y, x]]
    }

    /// Mutable access to the options at `cell`
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    #[allow(clippy::indexing_slicing)]
    pub fn options_mut(&mut self, cell: usize) -> &mut OptionSet {
        let [x, y] = self.coordinates(cell);
        &mut self.cells[[y, x]]
    }

    /// Replace the options at `cell`
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn set_options(&mut self, cell: usize, options: OptionSet) {
        *self.options_mut(cell) = options;
    }

    /// In-grid neighbours of `cell` with the direction leading to each
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn neighbors(&self, cell: usize) -> impl Iterator<Item = (usize, Direction)> + '_ {
        let [x, y] = self.coordinates(cell);
        Direction::ALL.into_iter().filter_map(move |direction| {
            let [dx, dy] = direction.offset();
            let nx = x.checked_add_signed(dx as isize)?;
            let ny = y.checked_add_signed(dy as isize)?;
            self.index(nx, ny).map(|neighbor| (neighbor, direction))
        })
    }

    /// Direction from `from` to an adjacent `to`
    ///
    /// Returns `None` when the cells are not 8-adjacent.
    ///
    /// # Panics
    ///
    /// Panics if either cell is outside the grid.
    pub fn direction_between(&self, from: usize, to: usize) -> Option<Direction> {
        let [fx, fy] = self.coordinates(from);
        let [tx, ty] = self.coordinates(to);
        let dx = i32::try_from(tx as i64 - fx as i64).ok()?;
        let dy = i32::try_from(ty as i64 - fy as i64).ok()?;
        Direction::from_offset(dx, dy)
    }

    /// True iff every cell holds exactly one option
    pub fn is_collapsed(&self) -> bool {
        self.cells.iter().all(|options| options.count() == 1)
    }

    /// First cell with no options left, if any
    pub fn first_contradiction(&self) -> Option<usize> {
        self.cells.iter().position(OptionSet::is_empty)
    }

    /// Iterate option sets in cell order
    pub fn iter(&self) -> impl Iterator<Item = &OptionSet> + '_ {
        self.cells.iter()
    }
}
