use crate::{
    compression::region::is_uniform,
    coordinate::Coordinate,
    image::Image,
    node::{QuadNode, Quadrant},
};

/// Regions with at least this side length are encoded with their quadrants
/// spread over the rayon thread pool.
pub const PARALLEL_THRESHOLD: usize = 128;

/// The result of compressing an [`Image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    /// Root of the compression tree.
    pub tree: QuadNode,

    /// Number of pixels in the source image.
    pub raw_size: usize,

    /// Number of nodes in the tree.
    pub compressed_size: usize,
}

/// Compress an entire image into a quadtree.
pub fn compress(image: &Image) -> Compressed {
    let (tree, compressed_size) = encode_parallel(image, Coordinate::ORIGIN, image.side_length());

    Compressed {
        tree,
        raw_size: image.raw_size(),
        compressed_size,
    }
}

/// Encode the `size`×`size` region at `start` into a tree, adding one to
/// `node_count` for every node produced.
///
/// A region becomes a leaf when it is a single pixel or when all of its
/// pixels are equal. Anything else is split into quadrants of half the size.
pub fn encode(image: &Image, start: Coordinate, size: usize, node_count: &mut usize) -> QuadNode {
    *node_count += 1;

    if size == 1 || is_uniform(image, start, size) {
        return QuadNode::Leaf(image.get(start));
    }

    let half = size / 2;
    let children = Quadrant::ALL.map(|q| encode(image, q.origin(start, half), half, node_count));

    QuadNode::Split(Box::new(children))
}

/// Same as [`encode`], but regions of at least [`PARALLEL_THRESHOLD`] have
/// their quadrants encoded in parallel. Returns the tree and its node count.
pub fn encode_parallel(image: &Image, start: Coordinate, size: usize) -> (QuadNode, usize) {
    if size < PARALLEL_THRESHOLD {
        let mut node_count = 0;
        let tree = encode(image, start, size, &mut node_count);
        return (tree, node_count);
    }

    if is_uniform(image, start, size) {
        return (QuadNode::Leaf(image.get(start)), 1);
    }

    let half = size / 2;
    let quadrant = |q: Quadrant| encode_parallel(image, q.origin(start, half), half);

    let (((ul, ul_n), (ur, ur_n)), ((ll, ll_n), (lr, lr_n))) = rayon::join(
        || rayon::join(|| quadrant(Quadrant::UpperLeft), || quadrant(Quadrant::UpperRight)),
        || rayon::join(|| quadrant(Quadrant::LowerLeft), || quadrant(Quadrant::LowerRight)),
    );

    (QuadNode::split(ul, ur, ll, lr), 1 + ul_n + ur_n + ll_n + lr_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(side_length: usize, pixels: &[u8]) -> Image {
        Image::from_raw(side_length, pixels.to_vec()).unwrap()
    }

    #[test]
    fn uniform_image_is_one_leaf() {
        let result = compress(&Image::new(8, 77).unwrap());

        assert_eq!(result.tree, QuadNode::Leaf(77));
        assert_eq!(result.raw_size, 64);
        assert_eq!(result.compressed_size, 1);
    }

    #[test]
    fn single_pixel() {
        let result = compress(&image(1, &[3]));

        assert_eq!(result.tree, QuadNode::Leaf(3));
        assert_eq!(result.raw_size, 1);
        assert_eq!(result.compressed_size, 1);
    }

    #[test]
    fn distinct_two_by_two() {
        let result = compress(&image(2, &[1, 2, 3, 4]));

        assert_eq!(
            result.tree,
            QuadNode::split(
                QuadNode::Leaf(1),
                QuadNode::Leaf(2),
                QuadNode::Leaf(3),
                QuadNode::Leaf(4),
            )
        );
        assert_eq!(result.compressed_size, 5);
    }

    #[test]
    fn checkerboard_fully_splits() {
        let pixels: Vec<u8> = (0..16).map(|i| if (i / 4 + i % 4) % 2 == 0 { 0 } else { 255 }).collect();
        let result = compress(&image(4, &pixels));

        // 1 root split, 4 quadrant splits, 16 single pixel leaves
        assert_eq!(result.compressed_size, 21);
        assert_eq!(result.tree.node_count(), 21);
        assert_eq!(result.tree.depth(), 2);
    }

    #[test]
    fn mixed_quadrants() {
        #[rustfmt::skip]
        let img = image(4, &[
            5, 5, 1, 2,
            5, 5, 3, 4,
            8, 8, 9, 9,
            8, 8, 9, 9,
        ]);
        let result = compress(&img);

        assert_eq!(
            result.tree,
            QuadNode::split(
                QuadNode::Leaf(5),
                QuadNode::split(
                    QuadNode::Leaf(1),
                    QuadNode::Leaf(2),
                    QuadNode::Leaf(3),
                    QuadNode::Leaf(4),
                ),
                QuadNode::Leaf(8),
                QuadNode::Leaf(9),
            )
        );
        assert_eq!(result.compressed_size, 9);
    }

    #[test]
    fn parallel_matches_sequential() {
        let side = PARALLEL_THRESHOLD * 4;
        let pixels: Vec<u8> = (0..side * side)
            .map(|i| {
                let (row, col) = (i / side, i % side);
                // blocks of varying size, plus some noise in one corner
                if row >= side - 8 && col >= side - 8 {
                    (row * 31 + col * 7) as u8
                } else {
                    ((row / 64) * 3 + (col / 32)) as u8
                }
            })
            .collect();
        let img = image(side, &pixels);

        let mut sequential_count = 0;
        let sequential = encode(&img, Coordinate::ORIGIN, side, &mut sequential_count);
        let (parallel, parallel_count) = encode_parallel(&img, Coordinate::ORIGIN, side);

        assert_eq!(sequential, parallel);
        assert_eq!(sequential_count, parallel_count);
        assert_eq!(parallel_count, parallel.node_count());
    }
}
