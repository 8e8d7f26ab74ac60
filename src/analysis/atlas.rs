//! Adjacency model learned from a periodic source image
//!
//! The atlas owns the unique tiles, the prototypes placed in output cells and
//! the directed connections saying which prototype may sit next to which.
//! It is immutable once built and can be shared by any number of solvers.

use std::collections::HashSet;

use crate::io::configuration::DEFAULT_KERNEL_SIZE;
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::bitmap::Bitmap;
use crate::spatial::direction::{Direction, DirectionMap};
use crate::spatial::tiles::{TileExtractor, do_images_overlap};

/// Index into [`TileAtlas::prototypes`]
pub type PrototypeId = usize;

/// Largest prototype count the packed connection key can address
pub const MAX_PROTOTYPES: usize = 1 << 30;

/// A placement variant of a tile
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prototype {
    /// Index into [`TileAtlas::tiles`]
    pub tile: usize,
    /// Clockwise quarter turns applied after mirroring
    pub rotation: u8,
    /// Whether the tile is mirrored along the vertical axis
    pub mirrored: bool,
    /// Relative frequency in the source, used as a sampling weight
    pub probability: f64,
}

impl Prototype {
    /// The untransformed variant of `tile`
    pub const fn identity(tile: usize, probability: f64) -> Self {
        Self {
            tile,
            rotation: 0,
            mirrored: false,
            probability,
        }
    }

    /// Apply this prototype's symmetry transform to its tile image
    pub fn transform(&self, tile: &Bitmap) -> Bitmap {
        if self.mirrored {
            tile.mirrored().rotated(self.rotation)
        } else {
            tile.rotated(self.rotation)
        }
    }
}

/// `to` may appear one step in `direction` from `from`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Prototype at the reference cell
    pub from: PrototypeId,
    /// Prototype at the neighbouring cell
    pub to: PrototypeId,
    /// Direction from the reference cell to the neighbour
    pub direction: Direction,
}

impl Connection {
    /// The same adjacency seen from the other side
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            direction: self.direction.opposite(),
        }
    }

    /// Packed key used by the connection index
    pub const fn key(&self) -> ConnectionKey {
        ConnectionKey::new(self.from, self.to, self.direction)
    }
}

/// `(from, to, direction)` packed into one integer
///
/// Bits 33.. hold `from`, bits 3..33 hold `to` and the low three bits hold
/// the direction. Exact for ids below [`MAX_PROTOTYPES`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey(u64);

impl ConnectionKey {
    /// Pack a connection tuple
    pub const fn new(from: PrototypeId, to: PrototypeId, direction: Direction) -> Self {
        Self(((from as u64) << 33) | ((to as u64) << 3) | direction.index() as u64)
    }
}

/// Options for building an atlas from an image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Tile edge length in pixels
    pub kernel_size: usize,
    /// Add the three rotated variants of every tile
    pub include_rotations: bool,
    /// Add the mirrored variant of every tile (and of every rotation)
    pub include_reflections: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            include_rotations: false,
            include_reflections: false,
        }
    }
}

impl AtlasConfig {
    /// Plain extraction with the given kernel size
    pub fn with_kernel_size(kernel_size: usize) -> Self {
        Self {
            kernel_size,
            ..Self::default()
        }
    }

    fn variants(&self) -> Vec<(u8, bool)> {
        let rotations: &[u8] = if self.include_rotations {
            &[0, 1, 2, 3]
        } else {
            &[0]
        };
        let mirrors: &[bool] = if self.include_reflections {
            &[false, true]
        } else {
            &[false]
        };
        mirrors
            .iter()
            .flat_map(|&mirrored| rotations.iter().map(move |&rotation| (rotation, mirrored)))
            .collect()
    }
}

/// Tiles, prototypes and the adjacency relation between prototypes
#[derive(Clone, Debug)]
pub struct TileAtlas {
    tiles: Vec<Bitmap>,
    prototypes: Vec<Prototype>,
    connections: Vec<Connection>,
    connection_index: HashSet<ConnectionKey>,
    // Effective image of each prototype, tile with its transform applied
    patches: Vec<Bitmap>,
}

impl TileAtlas {
    /// Build an atlas from every periodic `kernel_size` patch of `input`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `input` has no pixels
    /// - `kernel_size` is zero or larger than either image dimension
    pub fn from_periodic_source_image(input: &Bitmap, kernel_size: usize) -> Result<Self> {
        Self::from_source_image(input, &AtlasConfig::with_kernel_size(kernel_size))
    }

    /// Build an atlas with optional symmetry variants
    ///
    /// Each unique tile contributes one prototype per requested variant. A
    /// variant whose pixels equal an already registered prototype adds its
    /// weight to that prototype instead. Probabilities are accumulated weight
    /// over total accumulated weight, which without variants is
    /// `occurrences / pixels scanned`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `input` has no pixels
    /// - `kernel_size` is zero or larger than either image dimension
    /// - more than [`MAX_PROTOTYPES`] prototypes would be created
    pub fn from_source_image(input: &Bitmap, config: &AtlasConfig) -> Result<Self> {
        if input.is_empty() {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "Source image has no pixels".to_string(),
            });
        }
        let max_kernel = input.width().min(input.height());
        if config.kernel_size == 0 || config.kernel_size > max_kernel {
            return Err(invalid_parameter(
                "kernel_size",
                &config.kernel_size,
                &format!("must be between 1 and {max_kernel} for this image"),
            ));
        }

        let (tiles, weights, total_samples) =
            TileExtractor::extract_periodic_tiles(input, config.kernel_size).into_parts();
        log::debug!(
            "Extracted {} unique tiles from {total_samples} windows",
            tiles.len()
        );

        let mut prototypes: Vec<Prototype> = Vec::new();
        let mut patches: Vec<Bitmap> = Vec::new();
        let mut prototype_weights: Vec<usize> = Vec::new();
        let variants = config.variants();

        for (tile_index, (tile, &weight)) in tiles.iter().zip(&weights).enumerate() {
            for &(rotation, mirrored) in &variants {
                let prototype = Prototype {
                    tile: tile_index,
                    rotation,
                    mirrored,
                    probability: 0.0,
                };
                let patch = prototype.transform(tile);

                match patches.iter().position(|existing| *existing == patch) {
                    Some(existing) => {
                        if let Some(accumulated) = prototype_weights.get_mut(existing) {
                            *accumulated += weight;
                        }
                    }
                    None => {
                        prototypes.push(prototype);
                        patches.push(patch);
                        prototype_weights.push(weight);
                    }
                }
            }
        }

        if prototypes.len() > MAX_PROTOTYPES {
            return Err(invalid_parameter(
                "prototypes",
                &prototypes.len(),
                &format!("at most {MAX_PROTOTYPES} prototypes are supported"),
            ));
        }

        let total_weight = (total_samples * variants.len()) as f64;
        for (prototype, &weight) in prototypes.iter_mut().zip(&prototype_weights) {
            prototype.probability = weight as f64 / total_weight;
        }

        let connections = compute_connections(&patches);
        Ok(Self::assemble(tiles, prototypes, connections, patches))
    }

    /// Assemble an atlas from explicit parts
    ///
    /// Useful for hand-made adjacency rules. Duplicate connections are
    /// dropped; no symmetric counterparts are added.
    ///
    /// # Errors
    ///
    /// Returns an error if a prototype references a missing tile, a connection
    /// references a missing prototype, or there are more than
    /// [`MAX_PROTOTYPES`] prototypes.
    pub fn from_parts(
        tiles: Vec<Bitmap>,
        prototypes: Vec<Prototype>,
        connections: Vec<Connection>,
    ) -> Result<Self> {
        if prototypes.len() > MAX_PROTOTYPES {
            return Err(invalid_parameter(
                "prototypes",
                &prototypes.len(),
                &format!("at most {MAX_PROTOTYPES} prototypes are supported"),
            ));
        }

        let mut patches = Vec::with_capacity(prototypes.len());
        for prototype in &prototypes {
            let tile = tiles
                .get(prototype.tile)
                .ok_or(AlgorithmError::InvalidPrototype {
                    index: prototype.tile,
                    count: tiles.len(),
                })?;
            patches.push(prototype.transform(tile));
        }

        for connection in &connections {
            for id in [connection.from, connection.to] {
                if id >= prototypes.len() {
                    return Err(AlgorithmError::InvalidPrototype {
                        index: id,
                        count: prototypes.len(),
                    });
                }
            }
        }

        Ok(Self::assemble(tiles, prototypes, connections, patches))
    }

    fn assemble(
        tiles: Vec<Bitmap>,
        prototypes: Vec<Prototype>,
        connections: Vec<Connection>,
        patches: Vec<Bitmap>,
    ) -> Self {
        let mut connection_index = HashSet::with_capacity(connections.len());
        let connections: Vec<Connection> = connections
            .into_iter()
            .filter(|connection| connection_index.insert(connection.key()))
            .collect();

        Self {
            tiles,
            prototypes,
            connections,
            connection_index,
            patches,
        }
    }

    /// Unique tiles
    pub fn tiles(&self) -> &[Bitmap] {
        &self.tiles
    }

    /// All prototypes; a prototype's index is its [`PrototypeId`]
    pub fn prototypes(&self) -> &[Prototype] {
        &self.prototypes
    }

    /// All connections, without duplicates
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of prototypes
    pub fn prototype_count(&self) -> usize {
        self.prototypes.len()
    }

    /// Look up one prototype
    pub fn prototype(&self, id: PrototypeId) -> Option<&Prototype> {
        self.prototypes.get(id)
    }

    /// Edge length of the tiles, 0 for an atlas without tiles
    pub fn kernel_size(&self) -> usize {
        self.tiles.first().map_or(0, Bitmap::width)
    }

    /// Pixels of a prototype with its symmetry transform applied
    pub fn prototype_image(&self, id: PrototypeId) -> Option<&Bitmap> {
        self.patches.get(id)
    }

    /// May `to` sit one step in `direction` from `from`?
    ///
    /// A single hash lookup; the connection list is never scanned.
    pub fn can_be_connected(&self, from: PrototypeId, to: PrototypeId, direction: Direction) -> bool {
        from < self.prototypes.len()
            && to < self.prototypes.len()
            && self
                .connection_index
                .contains(&ConnectionKey::new(from, to, direction))
    }

    /// Prototypes allowed next to `id`, grouped by direction
    pub fn connections_of(&self, id: PrototypeId) -> DirectionMap<Vec<PrototypeId>> {
        self.concat_connections(&[id])
    }

    /// Union of the neighbours allowed for any of `ids`, grouped by direction
    ///
    /// Each list is sorted and free of duplicates.
    pub fn concat_connections(&self, ids: &[PrototypeId]) -> DirectionMap<Vec<PrototypeId>> {
        let mut map: DirectionMap<Vec<PrototypeId>> = DirectionMap::default();
        for connection in &self.connections {
            if ids.contains(&connection.from) {
                map[connection.direction].push(connection.to);
            }
        }
        for direction in Direction::ALL {
            let targets = &mut map[direction];
            targets.sort_unstable();
            targets.dedup();
        }
        map
    }
}

/// Connections between every pair of patches whose pixels agree under a unit offset
///
/// Pairs are visited once (`i <= j`); each match records the adjacency in
/// both directions.
fn compute_connections(patches: &[Bitmap]) -> Vec<Connection> {
    let mut connections = Vec::new();
    for (i, patch_a) in patches.iter().enumerate() {
        for (j, patch_b) in patches.iter().enumerate().skip(i) {
            for direction in Direction::ALL {
                if do_images_overlap(patch_a, patch_b, direction.offset()) {
                    let connection = Connection {
                        from: i,
                        to: j,
                        direction,
                    };
                    connections.push(connection);
                    connections.push(connection.reversed());
                }
            }
        }
    }
    connections
}
