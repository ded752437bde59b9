use crate::{
    coordinate::Coordinate,
    image::Image,
    node::{QuadNode, Quadrant},
    picture::Error,
    stream::check_depth,
};

/// Rebuild the image described by `tree`.
///
/// `side_length` must be a power of two deep enough to hold every split of
/// the tree.
pub fn uncompress(tree: &QuadNode, side_length: usize) -> Result<Image, Error> {
    check_depth(tree, side_length)?;
    let mut image = Image::new(side_length, 0)?;

    decode(tree, side_length, Coordinate::ORIGIN, &mut image);

    Ok(image)
}

/// Write the `size`×`size` region at `start` described by `node` into `out`.
///
/// Every pixel of the region is written exactly once. Panics if the tree is
/// deeper than the region can be divided, or if the region leaves the image.
pub fn decode(node: &QuadNode, size: usize, start: Coordinate, out: &mut Image) {
    match node {
        QuadNode::Leaf(value) => out.fill_region(start, size, *value),
        QuadNode::Split(children) => {
            assert!(size > 1, "split node at {start:?} in a region of size {size}");

            let half = size / 2;
            for (quadrant, child) in Quadrant::ALL.into_iter().zip(children.iter()) {
                decode(child, half, quadrant.origin(start, half), out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::encoder::compress;

    #[test]
    fn leaf_fills_everything() {
        let image = uncompress(&QuadNode::Leaf(42), 8).unwrap();

        assert_eq!(image.side_length(), 8);
        assert!(image.as_raw().iter().all(|&p| p == 42));
    }

    #[test]
    fn quadrant_placement() {
        let tree = QuadNode::split(
            QuadNode::Leaf(1),
            QuadNode::Leaf(2),
            QuadNode::Leaf(3),
            QuadNode::split(
                QuadNode::Leaf(4),
                QuadNode::Leaf(5),
                QuadNode::Leaf(6),
                QuadNode::Leaf(7),
            ),
        );
        let image = uncompress(&tree, 4).unwrap();

        #[rustfmt::skip]
        let expected = [
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 5,
            3, 3, 6, 7,
        ];
        assert_eq!(image.as_raw(), &expected);
    }

    #[test]
    fn round_trips_through_encoder() {
        #[rustfmt::skip]
        let original = Image::from_raw(4, vec![
            0, 0, 0, 9,
            0, 0, 0, 0,
            3, 3, 7, 7,
            3, 3, 7, 7,
        ]).unwrap();

        let compressed = compress(&original);
        let rebuilt = uncompress(&compressed.tree, original.side_length()).unwrap();

        assert_eq!(rebuilt, original);
    }

    #[test]
    fn tree_too_deep_for_size() {
        let tree = QuadNode::split(
            QuadNode::Leaf(1),
            QuadNode::Leaf(2),
            QuadNode::Leaf(3),
            QuadNode::Leaf(4),
        );

        assert!(matches!(
            uncompress(&tree, 1),
            Err(Error::DepthMismatch { depth: 1, side_length: 1 })
        ));
        assert!(matches!(uncompress(&tree, 3), Err(Error::NotPowerOfTwo(3))));
    }

    #[test]
    #[should_panic]
    fn decode_split_at_single_pixel() {
        let tree = QuadNode::split(
            QuadNode::Leaf(1),
            QuadNode::Leaf(2),
            QuadNode::Leaf(3),
            QuadNode::Leaf(4),
        );
        let mut out = Image::new(2, 0).unwrap();
        decode(&tree, 1, Coordinate::ORIGIN, &mut out);
    }
}
