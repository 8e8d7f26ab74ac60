//! Summary statistics over an atlas's adjacency relation

use std::fmt;

use crate::analysis::atlas::{PrototypeId, TileAtlas};
use crate::spatial::direction::{Direction, DirectionMap};

/// Counts describing how constrained an atlas is
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasSummary {
    /// Number of unique tiles
    pub tile_count: usize,
    /// Number of prototypes
    pub prototype_count: usize,
    /// Number of distinct connections
    pub connection_count: usize,
    /// Connections per direction
    pub connections_per_direction: DirectionMap<usize>,
    /// Prototypes allowed next to themselves in every direction
    pub self_tiling: Vec<PrototypeId>,
    /// Prototypes with no allowed neighbour in at least one direction
    ///
    /// These can only ever appear on the border of an output grid.
    pub dead_ends: Vec<PrototypeId>,
    /// Largest prototype probability
    pub max_probability: f64,
    /// Smallest prototype probability
    pub min_probability: f64,
}

impl AtlasSummary {
    /// Gather statistics from an atlas
    pub fn from_atlas(atlas: &TileAtlas) -> Self {
        let mut connections_per_direction: DirectionMap<usize> = DirectionMap::default();
        for connection in atlas.connections() {
            connections_per_direction[connection.direction] += 1;
        }

        let mut self_tiling = Vec::new();
        let mut dead_ends = Vec::new();
        for id in 0..atlas.prototype_count() {
            let neighbors = atlas.connections_of(id);
            if Direction::ALL
                .iter()
                .all(|&direction| atlas.can_be_connected(id, id, direction))
            {
                self_tiling.push(id);
            }
            if neighbors.iter().any(|(_, allowed)| allowed.is_empty()) {
                dead_ends.push(id);
            }
        }

        let probabilities = atlas.prototypes().iter().map(|p| p.probability);
        let max_probability = probabilities.clone().fold(0.0, f64::max);
        let min_probability = if atlas.prototype_count() == 0 {
            0.0
        } else {
            probabilities.fold(f64::INFINITY, f64::min)
        };

        Self {
            tile_count: atlas.tiles().len(),
            prototype_count: atlas.prototype_count(),
            connection_count: atlas.connections().len(),
            connections_per_direction,
            self_tiling,
            dead_ends,
            max_probability,
            min_probability,
        }
    }

    /// Mean number of allowed neighbours per prototype and direction
    pub fn mean_branching(&self) -> f64 {
        if self.prototype_count == 0 {
            return 0.0;
        }
        self.connection_count as f64 / (self.prototype_count * Direction::ALL.len()) as f64
    }
}

impl fmt::Display for AtlasSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles, {} prototypes, {} connections (branching {:.2}",
            self.tile_count,
            self.prototype_count,
            self.connection_count,
            self.mean_branching()
        )?;
        for (direction, count) in self.connections_per_direction.iter() {
            write!(f, ", {direction}: {count}")?;
        }
        write!(
            f,
            "), p in [{:.4}, {:.4}], {} dead ends",
            self.min_probability,
            self.max_probability,
            self.dead_ends.len()
        )
    }
}
