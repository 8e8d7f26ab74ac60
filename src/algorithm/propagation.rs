use crate::{
    analysis::atlas::{PrototypeId, TileAtlas},
    spatial::{direction::Direction, grid::Wave},
};
use bitvec::prelude::*;

/// Options removed by one propagation pass, in removal order
///
/// Replaying the log re-inserts exactly what the pass removed and nothing
/// else, which returns every touched cell to its pre-pass state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollbackLog {
    entries: Vec<(usize, PrototypeId)>,
}

impl RollbackLog {
    /// Create an empty log
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Remember that `option` was removed from `cell`
    pub fn record(&mut self, cell: usize, option: PrototypeId) {
        self.entries.push((cell, option));
    }

    /// Recorded `(cell, option)` removals
    pub fn entries(&self) -> &[(usize, PrototypeId)] {
        &self.entries
    }

    /// Number of recorded removals
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Test if nothing was removed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put every recorded option back
    pub fn restore(&self, wave: &mut Wave) {
        for &(cell, option) in &self.entries {
            wave.options_mut(cell).insert(option);
        }
    }
}

/// Outcome of a propagation pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    /// No stack left to process; the wave is at a fixpoint
    Settled {
        /// Number of options removed across all cells
        removed: usize,
    },
    /// `cell` lost its last option; every removal has been undone
    Contradiction {
        /// The cell that became empty
        cell: usize,
    },
    /// The iteration ceiling was reached; every removal has been undone
    IterationLimit,
}

impl Propagation {
    /// True when the pass reached a fixpoint and its removals stand
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }
}

/// Remove options that lost all support, starting from `start_cell`
///
/// Depth-first flood fill over the 8-neighbourhood. A popped cell is marked
/// visited and each unvisited neighbour keeps only the options that at least
/// one of the popped cell's options allows in that direction. Neighbours that
/// changed are pushed so their own neighbours get rechecked.
///
/// On contradiction or when `max_iterations` pops are exhausted, the pass is
/// rolled back in full before returning.
///
/// # Panics
///
/// Panics if `start_cell` is outside the wave.
pub fn remove_invalid_options(
    wave: &mut Wave,
    atlas: &TileAtlas,
    start_cell: usize,
    max_iterations: usize,
) -> Propagation {
    let mut stack = vec![start_cell];
    let mut visited = bitvec![0; wave.len()];
    let mut log = RollbackLog::new();

    for _ in 0..max_iterations {
        let Some(cell) = stack.pop() else {
            return Propagation::Settled { removed: log.len() };
        };
        visited.set(cell, true);

        let sources = wave.options(cell).to_vec();
        let neighbors: Vec<(usize, Direction)> = wave.neighbors(cell).collect();

        for (neighbor, direction) in neighbors {
            if visited.get(neighbor).as_deref() == Some(&true) {
                continue;
            }

            let changed = remove_invalid_options_of_neighbor(
                wave, atlas, &sources, neighbor, direction, &mut log,
            );

            if wave.options(neighbor).is_empty() {
                log::trace!(
                    "Cell {neighbor} emptied while propagating from {start_cell}, undoing {} removals",
                    log.len()
                );
                log.restore(wave);
                return Propagation::Contradiction { cell: neighbor };
            }

            if changed {
                stack.push(neighbor);
            }
        }
    }

    if stack.is_empty() {
        return Propagation::Settled { removed: log.len() };
    }

    log::warn!("Propagation from cell {start_cell} reached the limit of {max_iterations} steps");
    log.restore(wave);
    Propagation::IterationLimit
}

/// Drop every option of `neighbor` that no option in `sources` permits
///
/// Returns whether anything was removed.
fn remove_invalid_options_of_neighbor(
    wave: &mut Wave,
    atlas: &TileAtlas,
    sources: &[PrototypeId],
    neighbor: usize,
    direction: Direction,
    log: &mut RollbackLog,
) -> bool {
    let targets = wave.options(neighbor).to_vec();
    let mut changed = false;

    for target in targets {
        let allowed = sources
            .iter()
            .any(|&source| atlas.can_be_connected(source, target, direction));

        if !allowed && wave.options_mut(neighbor).remove(target) {
            log.record(neighbor, target);
            changed = true;
        }
    }

    changed
}
