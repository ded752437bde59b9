//! Lossless quadtree compression for square grayscale images.
//!
//! An image whose side length is a power of two is recursively divided into
//! quadrants until every region is a single grayscale level. The resulting
//! tree is stored as its preorder listing, where `-1` marks a region split
//! into four and any other record is the level of a uniform region. Images
//! made of large flat areas shrink to a handful of records; the worst case
//! (no two neighbouring pixels alike) costs about a third more records than
//! there are pixels.
//!
//! # Example
//! ## Compressing pixel values
//! ```
//! let pixels = [
//!     1, 2,
//!     3, 4,
//! ];
//!
//! let compressed = qtree::compress(&pixels).unwrap();
//! assert_eq!(compressed.records, [-1, 1, 2, 3, 4]);
//! assert_eq!(compressed.raw_size, 4);
//! assert_eq!(compressed.compressed_size, 5);
//!
//! let (restored, side_length) = qtree::uncompress(4, &compressed.records).unwrap();
//! assert_eq!(restored, [1, 2, 3, 4]);
//! assert_eq!(side_length, 2);
//! ```
//!
//! ## Reading and writing files
//! ```no_run
//! use qtree::{Image, QuadPicture};
//!
//! let image = Image::new(64, 128).unwrap();
//! let picture = QuadPicture::from_image(image);
//! assert_eq!(picture.compressed_size(), 1);
//!
//! // The extension picks the format: `.raw` for pixels, `.qtb` for the
//! // binary container, anything else for the compressed text form.
//! picture.save("flat.rit").expect("Could not save the image");
//!
//! let reopened = qtree::open("flat.rit").expect("Could not open file");
//! assert_eq!(reopened.image(), picture.image());
//! ```

pub mod compression {
    pub mod decoder;
    pub mod encoder;
    pub mod region;
}
pub mod binio;

pub mod coordinate;
pub mod header;
pub mod image;
pub mod node;
pub mod picture;
pub mod stream;

// ----------------------- //
// INLINED USEFUL FEATURES //
// ----------------------- //
#[doc(inline)]
pub use coordinate::Coordinate;

#[doc(inline)]
pub use image::Image;

#[doc(inline)]
pub use node::{QuadNode, Quadrant};

#[doc(inline)]
pub use picture::{open, Container, Error, QuadPicture};

#[doc(inline)]
pub use stream::QUAD_SPLIT;

/// Preorder records of a compressed image, along with its sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedRecords {
    /// The tree in preorder, without any size header.
    pub records: Vec<i32>,

    /// Number of pixels in the source image.
    pub raw_size: usize,

    /// Number of nodes in the tree, which is also the number of records.
    pub compressed_size: usize,
}

/// Compress row-major pixel values into preorder records.
///
/// The number of values must be the square of a power of two and every
/// value must be in `0..=255`.
pub fn compress(pixels: &[i32]) -> Result<CompressedRecords, Error> {
    let image = Image::from_values(pixels)?;
    let compressed = compression::encoder::compress(&image);

    Ok(CompressedRecords {
        records: stream::flatten(&compressed.tree),
        raw_size: compressed.raw_size,
        compressed_size: compressed.compressed_size,
    })
}

/// Rebuild the row-major pixels of an image of `pixel_count` pixels from its
/// preorder records. Returns the pixels and the side length of the image.
pub fn uncompress(pixel_count: usize, records: &[i32]) -> Result<(Vec<u8>, usize), Error> {
    let side_length = stream::side_length_for(pixel_count)?;
    let tree = stream::parse_all(records)?;
    let image = compression::decoder::uncompress(&tree, side_length)?;

    Ok((image.into_raw(), side_length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_round_trip() {
        #[rustfmt::skip]
        let pixels = [
            7, 7, 7, 7,
            7, 7, 7, 7,
            7, 7, 0, 1,
            7, 7, 2, 3,
        ];

        let compressed = compress(&pixels).unwrap();
        assert_eq!(compressed.records, [-1, 7, 7, 7, -1, 0, 1, 2, 3]);
        assert_eq!(compressed.raw_size, 16);
        assert_eq!(compressed.compressed_size, compressed.records.len());

        let (restored, side_length) = uncompress(16, &compressed.records).unwrap();
        assert_eq!(side_length, 4);
        assert!(restored.iter().map(|&p| i32::from(p)).eq(pixels));
    }

    #[test]
    fn collaborator_errors() {
        assert!(matches!(compress(&[1, 2, 3]), Err(Error::NotPerfectSquare(3))));
        assert!(matches!(
            compress(&[1, -1, 3, 4]),
            Err(Error::InvalidValue { value: -1, index: 1 })
        ));
        assert!(matches!(
            uncompress(4, &[-1, 5, 5]),
            Err(Error::MalformedStream { remaining: 2 })
        ));
        assert!(matches!(uncompress(32, &[0]), Err(Error::NotPerfectSquare(32))));
    }
}
