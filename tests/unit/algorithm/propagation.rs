//! Tests for constraint propagation and its rollback log

#[cfg(test)]
mod tests {
    use tilecollapse::algorithm::bitset::OptionSet;
    use tilecollapse::algorithm::propagation::{Propagation, RollbackLog, remove_invalid_options};
    use tilecollapse::analysis::atlas::{AtlasConfig, Connection, Prototype, TileAtlas};
    use tilecollapse::spatial::bitmap::Bitmap;
    use tilecollapse::spatial::direction::Direction;
    use tilecollapse::spatial::grid::Wave;

    // Every prototype may only sit next to itself
    fn same_neighbours_atlas(count: usize) -> TileAtlas {
        let tiles = (0..count)
            .map(|i| Bitmap::from_fn(1, 1, |_, _| [i as u8, 0, 0, 255]))
            .collect();
        let prototypes = (0..count)
            .map(|i| Prototype::identity(i, 1.0 / count as f64))
            .collect();
        let connections = (0..count)
            .flat_map(|id| {
                Direction::ALL.map(|direction| Connection {
                    from: id,
                    to: id,
                    direction,
                })
            })
            .collect();
        TileAtlas::from_parts(tiles, prototypes, connections).expect("valid atlas")
    }

    // Tests a collapse spreads across the whole row
    // Verified by not pushing changed neighbours onto the stack
    #[test]
    fn test_propagation_reaches_fixpoint() {
        let atlas = same_neighbours_atlas(2);
        let mut wave = Wave::new(4, 1, 2);
        wave.options_mut(0).collapse_to(1);

        let result = remove_invalid_options(&mut wave, &atlas, 0, 1_000);

        assert_eq!(result, Propagation::Settled { removed: 3 });
        assert!(result.is_settled());
        for cell in 0..4 {
            assert_eq!(wave.options(cell).single(), Some(1));
        }
    }

    // Tests diagonal neighbours are constrained too
    // Verified by restricting neighbours to the cardinal directions
    #[test]
    fn test_propagation_covers_diagonals() {
        let atlas = same_neighbours_atlas(3);
        let mut wave = Wave::new(2, 2, 3);
        wave.options_mut(0).collapse_to(2);

        let result = remove_invalid_options(&mut wave, &atlas, 0, 1_000);

        assert!(result.is_settled());
        assert_eq!(wave.options(3).to_vec(), vec![2]);
    }

    // Tests a settled pass only ever shrinks option sets
    // Verified by re-inserting options a neighbour supports
    #[test]
    fn test_settled_pass_only_shrinks_options() {
        // Vertical and horizontal stripes, so diagonal cells keep several options
        let stripes = Bitmap::from_fn(4, 4, |x, _| {
            if x % 2 == 0 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        });
        let config = AtlasConfig {
            kernel_size: 2,
            include_rotations: true,
            include_reflections: false,
        };
        let atlas = TileAtlas::from_source_image(&stripes, &config).expect("valid atlas");
        let mut wave = Wave::new(5, 5, atlas.prototype_count());
        // Two cells a stripe period apart agree in either orientation
        wave.options_mut(0).collapse_to(0);
        wave.options_mut(12).collapse_to(0);
        let snapshot = wave.clone();

        let result = remove_invalid_options(&mut wave, &atlas, 12, 10_000);

        for cell in 0..wave.len() {
            let before = snapshot.options(cell).to_vec();
            let after = wave.options(cell).to_vec();
            assert!(!after.is_empty());
            assert!(
                after.iter().all(|option| before.contains(option)),
                "cell {cell} grew from {before:?} to {after:?}"
            );
        }
        let count_before: usize = snapshot.iter().map(OptionSet::count).sum();
        let count_after: usize = wave.iter().map(OptionSet::count).sum();
        assert!(count_after < count_before);
        assert_eq!(
            result,
            Propagation::Settled {
                removed: count_before - count_after
            }
        );
        assert_eq!(wave.options(0), snapshot.options(0));
        assert_eq!(wave.options(12).single(), Some(0));
    }

    // Tests a contradiction restores every touched cell exactly
    // Verified by skipping the rollback replay on contradiction
    #[test]
    fn test_contradiction_rolls_back_everything() {
        let atlas = same_neighbours_atlas(2);
        let mut wave = Wave::new(3, 1, 2);
        wave.set_options(2, OptionSet::singleton(2, 1));
        wave.options_mut(0).collapse_to(0);
        let snapshot = wave.clone();

        let result = remove_invalid_options(&mut wave, &atlas, 0, 1_000);

        assert_eq!(result, Propagation::Contradiction { cell: 2 });
        assert!(!result.is_settled());
        assert_eq!(wave, snapshot);
        assert_eq!(wave.options(1).count(), 2);
    }

    // Tests the iteration ceiling aborts and undoes the pass
    // Verified by returning Settled when the loop ends
    #[test]
    fn test_iteration_limit_rolls_back() {
        let atlas = same_neighbours_atlas(2);
        let mut wave = Wave::new(3, 1, 2);
        wave.options_mut(0).collapse_to(0);
        let snapshot = wave.clone();

        let result = remove_invalid_options(&mut wave, &atlas, 0, 1);

        assert_eq!(result, Propagation::IterationLimit);
        assert_eq!(wave, snapshot);
    }

    // Tests nothing is removed when every pairing is allowed
    // Verified by removing targets without checking connections
    #[test]
    fn test_unconstrained_atlas_removes_nothing() {
        let source = Bitmap::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        });
        let atlas = TileAtlas::from_periodic_source_image(&source, 1).expect("valid atlas");
        let mut wave = Wave::new(3, 3, atlas.prototype_count());
        wave.options_mut(4).collapse_to(0);

        let result = remove_invalid_options(&mut wave, &atlas, 4, 1_000);

        assert_eq!(result, Propagation::Settled { removed: 0 });
        assert_eq!(wave.options(0).count(), 2);
    }

    // Tests the rollback log re-inserts recorded removals only
    // Verified by clearing the cell instead of re-inserting
    #[test]
    fn test_rollback_log_restore() {
        let mut wave = Wave::new(2, 1, 3);
        let mut log = RollbackLog::new();
        assert!(log.is_empty());

        wave.options_mut(1).remove(0);
        log.record(1, 0);
        wave.options_mut(1).remove(2);
        log.record(1, 2);
        // Not recorded, must stay removed
        wave.options_mut(0).remove(1);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries(), &[(1, 0), (1, 2)]);

        log.restore(&mut wave);
        assert_eq!(wave.options(1).count(), 3);
        assert_eq!(wave.options(0).to_vec(), vec![0, 2]);
    }
}
