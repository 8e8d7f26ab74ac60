use crate::{
    algorithm::bitset::OptionSet, analysis::atlas::TileAtlas, math::probability::shannon_entropy,
    spatial::grid::Wave,
};

/// How the next cell to collapse is ranked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Least Shannon entropy of the remaining options' probabilities
    #[default]
    Shannon,
    /// Fewest remaining options
    OptionCount,
}

/// Result of scanning the wave for the next cell to collapse
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Every cell holds exactly one option
    Collapsed,
    /// This cell has no options left
    Contradiction(usize),
    /// Best-ranked uncollapsed cells in cell order; never empty
    Candidates(Vec<usize>),
}

/// Shannon entropy of a cell's remaining options
///
/// Uses the prototypes' source probabilities without renormalising them to
/// the cell.
pub fn cell_entropy(options: &OptionSet, atlas: &TileAtlas) -> f64 {
    shannon_entropy(
        options
            .iter()
            .filter_map(|id| atlas.prototype(id).map(|prototype| prototype.probability)),
    )
}

/// Uncollapsed cells sharing the lowest score under `heuristic`
///
/// Cells with one option are skipped, as are empty cells. Ties need exact
/// floating-point equality; there is no tolerance.
#[allow(clippy::float_cmp)]
pub fn cells_with_least_score(wave: &Wave, atlas: &TileAtlas, heuristic: Heuristic) -> Vec<usize> {
    let mut least = Vec::new();
    let mut least_score = f64::INFINITY;

    for (cell, options) in wave.iter().enumerate() {
        if options.count() <= 1 {
            continue;
        }

        let score = match heuristic {
            Heuristic::Shannon => cell_entropy(options, atlas),
            Heuristic::OptionCount => options.count() as f64,
        };

        if score == least_score {
            least.push(cell);
        } else if score < least_score {
            least.clear();
            least.push(cell);
            least_score = score;
        }
    }

    least
}

/// Uncollapsed cells sharing the lowest Shannon entropy
pub fn cells_with_least_entropy(wave: &Wave, atlas: &TileAtlas) -> Vec<usize> {
    cells_with_least_score(wave, atlas, Heuristic::Shannon)
}

/// Decide what the solver should look at next
pub fn select_cell(wave: &Wave, atlas: &TileAtlas, heuristic: Heuristic) -> Selection {
    if let Some(cell) = wave.first_contradiction() {
        return Selection::Contradiction(cell);
    }

    let candidates = cells_with_least_score(wave, atlas, heuristic);
    if candidates.is_empty() {
        Selection::Collapsed
    } else {
        Selection::Candidates(candidates)
    }
}
