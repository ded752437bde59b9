use std::ops::Index;

use crate::{coordinate::Coordinate, picture::Error, stream::side_length_for};

/// A square 8 bit grayscale raster whose side length is a power of two.
///
/// Pixels are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    side_length: usize,
    pixels: Vec<u8>,
}

impl Image {
    /// Create an image with every pixel set to `fill`.
    pub fn new(side_length: usize, fill: u8) -> Result<Self, Error> {
        let pixel_count = pixel_count(side_length)?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(pixel_count)
            .map_err(|_| Error::ImageTooLarge(side_length))?;
        pixels.resize(pixel_count, fill);

        Ok(Self { side_length, pixels })
    }

    /// Wrap an existing row-major pixel buffer.
    pub fn from_raw(side_length: usize, pixels: Vec<u8>) -> Result<Self, Error> {
        let declared = pixel_count(side_length)?;

        if pixels.len() != declared {
            return Err(Error::CountMismatch {
                declared,
                actual: pixels.len(),
            });
        }

        Ok(Self { side_length, pixels })
    }

    /// Build an image from raw pixel values as read from a file.
    ///
    /// The number of values must be the square of a power of two, and every
    /// value must be a grayscale level in `0..=255`. In particular `-1` is
    /// reserved for marking splits and is never a valid pixel.
    pub fn from_values(values: &[i32]) -> Result<Self, Error> {
        let side_length = side_length_for(values.len())?;

        let pixels = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                u8::try_from(value).map_err(|_| Error::InvalidValue { value, index })
            })
            .collect::<Result<Vec<u8>, Error>>()?;

        Ok(Self { side_length, pixels })
    }

    pub fn side_length(&self) -> usize {
        self.side_length
    }

    /// Number of pixels in the image.
    pub fn raw_size(&self) -> usize {
        self.pixels.len()
    }

    /// Get a pixel, panicking when the coordinate is outside the image.
    pub fn get(&self, at: Coordinate) -> u8 {
        self.pixels[self.offset_of(at)]
    }

    pub fn set(&mut self, at: Coordinate, value: u8) {
        let offset = self.offset_of(at);
        self.pixels[offset] = value;
    }

    /// One row of pixels, left to right.
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.side_length;
        &self.pixels[start..start + self.side_length]
    }

    /// The `size` pixels of `row` starting at column `col`.
    pub(crate) fn span(&self, row: usize, col: usize, size: usize) -> &[u8] {
        assert!(
            col + size <= self.side_length,
            "span at column {col} with size {size} exceeds image width {}",
            self.side_length
        );

        let start = self.offset_of(Coordinate::new(row, col));
        &self.pixels[start..start + size]
    }

    /// Set every pixel in the `size`×`size` region at `start` to `value`.
    pub fn fill_region(&mut self, start: Coordinate, size: usize, value: u8) {
        assert!(
            start.col + size <= self.side_length,
            "region at {start:?} with size {size} exceeds image width {}",
            self.side_length
        );

        for row in start.row..start.row + size {
            let offset = self.offset_of(Coordinate::new(row, start.col));
            self.pixels[offset..offset + size].fill(value);
        }
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixels widened to the integer record type used by the file formats.
    pub fn to_values(&self) -> Vec<i32> {
        self.pixels.iter().map(|&p| i32::from(p)).collect()
    }

    fn offset_of(&self, at: Coordinate) -> usize {
        assert!(
            at.row < self.side_length && at.col < self.side_length,
            "coordinate {at:?} outside of {0}×{0} image",
            self.side_length
        );

        at.row * self.side_length + at.col
    }
}

impl Index<Coordinate> for Image {
    type Output = u8;

    fn index(&self, at: Coordinate) -> &Self::Output {
        &self.pixels[self.offset_of(at)]
    }
}

/// Number of pixels in an image of `side_length`, if it is a valid one.
fn pixel_count(side_length: usize) -> Result<usize, Error> {
    if !side_length.is_power_of_two() {
        return Err(Error::NotPowerOfTwo(side_length));
    }

    side_length
        .checked_mul(side_length)
        .ok_or(Error::ImageTooLarge(side_length))
}
