//! Tests for periodic tile extraction and overlap checks

#[cfg(test)]
mod tests {
    use tilecollapse::spatial::bitmap::Bitmap;
    use tilecollapse::spatial::direction::Direction;
    use tilecollapse::spatial::tiles::{TileExtractor, do_images_overlap};

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    // Tests one window per pixel and merging of equal windows
    // Verified by counting only unique windows as samples
    #[test]
    fn test_extraction_counts() {
        let source = Bitmap::from_fn(4, 4, |x, _| if x % 2 == 0 { BLACK } else { WHITE });
        let extractor = TileExtractor::extract_periodic_tiles(&source, 2);

        assert_eq!(extractor.total_samples(), 16);
        assert_eq!(extractor.tiles().len(), 2);
        assert_eq!(extractor.weights(), &[8, 8]);
        assert_eq!(extractor.tiles()[0].get(0, 0), Some(BLACK));
    }

    // Tests windows wrap at the image border
    // Verified by skipping windows that cross the edge
    #[test]
    fn test_extraction_wraps() {
        let source = Bitmap::from_fn(3, 1, |x, _| if x == 0 { WHITE } else { BLACK });
        let (tiles, weights, total) = TileExtractor::extract_periodic_tiles(&source, 1).into_parts();
        assert_eq!(total, 3);
        assert_eq!(tiles.len(), 2);
        assert_eq!(weights, vec![1, 2]);

        let tall = Bitmap::from_fn(2, 2, |x, y| if x == 1 && y == 1 { WHITE } else { BLACK });
        let extractor = TileExtractor::extract_periodic_tiles(&tall, 2);
        // Every window contains the single white pixel once
        assert_eq!(extractor.tiles().len(), 4);
        assert!(extractor.weights().iter().all(|&w| w == 1));
    }

    // Tests zero offset overlap holds exactly for equal images
    // Verified by returning true for any same-sized pair
    #[test]
    fn test_zero_offset_is_equality() {
        let a = Bitmap::from_fn(2, 2, |x, y| if x == y { BLACK } else { WHITE });
        let b = a.mirrored();
        assert!(do_images_overlap(&a, &a, [0, 0]));
        assert!(!do_images_overlap(&a, &b, [0, 0]));
    }

    // Tests the overlap window for a horizontal shift
    // Verified by offsetting the wrong image
    #[test]
    fn test_horizontal_overlap() {
        let left = Bitmap::from_fn(3, 1, |x, _| if x == 0 { BLACK } else { WHITE });
        let right = Bitmap::from_fn(3, 1, |x, _| if x == 2 { BLACK } else { WHITE });

        assert!(do_images_overlap(&left, &right, Direction::East.offset()));
        assert!(!do_images_overlap(&left, &right, Direction::West.offset()));
        assert!(do_images_overlap(&right, &left, Direction::West.offset()));
    }

    // Tests single-pixel tiles overlap in every unit direction
    // Verified by requiring a non-empty window
    #[test]
    fn test_empty_window_overlaps() {
        let a = Bitmap::from_fn(1, 1, |_, _| BLACK);
        let b = Bitmap::from_fn(1, 1, |_, _| WHITE);
        for direction in Direction::ALL {
            assert!(do_images_overlap(&a, &b, direction.offset()));
        }
    }

    // Tests differently sized images never overlap
    // Verified by removing the size check
    #[test]
    fn test_size_mismatch() {
        assert!(!do_images_overlap(&Bitmap::new(2, 2), &Bitmap::new(3, 3), [0, 0]));
    }
}
