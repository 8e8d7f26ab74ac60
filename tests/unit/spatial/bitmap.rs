//! Tests for bitmap access, periodic trimming and symmetry transforms

#[cfg(test)]
mod tests {
    use tilecollapse::spatial::bitmap::{Bitmap, Rgba};

    fn gray(value: u8) -> Rgba {
        [value, value, value, 255]
    }

    // 3x2 bitmap where pixel (x, y) has gray level 10 * (y * 3 + x)
    fn numbered() -> Bitmap {
        Bitmap::from_fn(3, 2, |x, y| gray((10 * (y * 3 + x)) as u8))
    }

    // Tests dimensions and coordinate order
    // Verified by swapping x and y in get
    #[test]
    fn test_dimensions_and_get() {
        let bitmap = numbered();
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert_eq!(bitmap.pixel_count(), 6);
        assert_eq!(bitmap.get(2, 0), Some(gray(20)));
        assert_eq!(bitmap.get(0, 1), Some(gray(30)));
        assert_eq!(bitmap.get(3, 0), None);
    }

    // Tests row-major indexing matches coordinates
    // Verified by dividing by height instead of width
    #[test]
    fn test_index_access() {
        let mut bitmap = numbered();
        assert_eq!(bitmap.get_with_index(4), Some(gray(40)));
        assert_eq!(bitmap.get_with_index(6), None);

        bitmap.set_with_index(5, gray(1));
        assert_eq!(bitmap.get(2, 1), Some(gray(1)));
        bitmap.set(7, 7, gray(2));
        assert_eq!(bitmap, {
            let mut expected = numbered();
            expected.set(2, 1, gray(1));
            expected
        });
    }

    // Tests construction from raw pixels checks the length
    // Verified by ignoring the shape error
    #[test]
    fn test_from_pixels() {
        let pixels: Vec<Rgba> = (0..6).map(|i| gray(i * 10)).collect();
        assert_eq!(Bitmap::from_pixels(3, 2, pixels.clone()), Some(numbered()));
        assert_eq!(Bitmap::from_pixels(4, 2, pixels), None);
    }

    // Tests reads wrap in both directions
    // Verified by using % instead of rem_euclid
    #[test]
    fn test_get_periodic() {
        let bitmap = numbered();
        assert_eq!(bitmap.get_periodic(-1, 0), Some(gray(20)));
        assert_eq!(bitmap.get_periodic(3, 2), Some(gray(0)));
        assert_eq!(bitmap.get_periodic(-4, -1), Some(gray(50)));
        assert_eq!(Bitmap::new(0, 0).get_periodic(0, 0), None);
    }

    // Tests trimming across the right and bottom edges wraps around
    // Verified by clamping coordinates instead of wrapping
    #[test]
    fn test_periodic_trim_wraps() {
        let bitmap = numbered();
        let tile = bitmap.periodic_trim(2, 1, 4, 3);

        assert_eq!((tile.width(), tile.height()), (2, 2));
        assert_eq!(tile.get(0, 0), Some(gray(50)));
        assert_eq!(tile.get(1, 0), Some(gray(30)));
        assert_eq!(tile.get(0, 1), Some(gray(20)));
        assert_eq!(tile.get(1, 1), Some(gray(0)));
    }

    // Tests a clockwise quarter turn and full-turn identity
    // Verified by rotating counter-clockwise
    #[test]
    fn test_rotation() {
        let bitmap = numbered();
        let turned = bitmap.rotated_90();

        assert_eq!((turned.width(), turned.height()), (2, 3));
        // The bottom-left corner moves to the top-left
        assert_eq!(turned.get(0, 0), Some(gray(30)));
        assert_eq!(turned.get(1, 0), Some(gray(0)));
        assert_eq!(turned.get(1, 2), Some(gray(20)));

        assert_eq!(bitmap.rotated(4), bitmap);
        assert_eq!(bitmap.rotated(2), turned.rotated_90());
    }

    // Tests mirroring flips columns and is an involution
    // Verified by flipping rows instead
    #[test]
    fn test_mirror() {
        let bitmap = numbered();
        let mirrored = bitmap.mirrored();
        assert_eq!(mirrored.get(0, 0), Some(gray(20)));
        assert_eq!(mirrored.get(2, 1), Some(gray(30)));
        assert_eq!(mirrored.mirrored(), bitmap);
    }

    // Tests equality needs every channel to match
    // Verified by comparing only dimensions
    #[test]
    fn test_equality_is_exact() {
        let a = Bitmap::from_fn(2, 2, |_, _| [1, 2, 3, 4]);
        let mut b = a.clone();
        assert_eq!(a, b);
        b.set(1, 1, [1, 2, 3, 5]);
        assert_ne!(a, b);
        assert_ne!(Bitmap::new(2, 1), Bitmap::new(1, 2));
    }
}
