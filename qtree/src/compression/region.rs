use crate::{coordinate::Coordinate, image::Image};

/// Check whether every pixel in the `size`×`size` region starting at `start`
/// has the same value as the pixel at `start`.
///
/// Stops at the first differing pixel. The region must lie inside the image,
/// otherwise this panics.
pub fn is_uniform(image: &Image, start: Coordinate, size: usize) -> bool {
    let first = image.get(start);

    (start.row..start.row + size)
        .all(|row| image.span(row, start.col, size).iter().all(|&p| p == first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(side_length: usize, pixels: &[u8]) -> Image {
        Image::from_raw(side_length, pixels.to_vec()).unwrap()
    }

    #[test]
    fn single_pixel_is_uniform() {
        let img = image(2, &[1, 2, 3, 4]);
        for row in 0..2 {
            for col in 0..2 {
                assert!(is_uniform(&img, Coordinate::new(row, col), 1));
            }
        }
        assert!(!is_uniform(&img, Coordinate::ORIGIN, 2));
    }

    #[test]
    fn sub_regions() {
        #[rustfmt::skip]
        let img = image(4, &[
            5, 5, 1, 2,
            5, 5, 3, 4,
            8, 8, 9, 9,
            8, 8, 9, 0,
        ]);

        assert!(is_uniform(&img, Coordinate::new(0, 0), 2));
        assert!(!is_uniform(&img, Coordinate::new(0, 2), 2));
        assert!(is_uniform(&img, Coordinate::new(2, 0), 2));
        assert!(!is_uniform(&img, Coordinate::new(2, 2), 2));
        assert!(!is_uniform(&img, Coordinate::ORIGIN, 4));
    }

    #[test]
    fn whole_image() {
        let img = Image::new(8, 200).unwrap();
        assert!(is_uniform(&img, Coordinate::ORIGIN, 8));
    }

    #[test]
    #[should_panic]
    fn region_past_the_edge() {
        let img = Image::new(4, 0).unwrap();
        is_uniform(&img, Coordinate::new(2, 2), 4);
    }
}
