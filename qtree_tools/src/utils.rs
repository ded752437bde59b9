use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Result};
use image::{DynamicImage, GrayImage};
use text_io::read;

pub enum Assume {
    Yes,
    No,
}

/// Convert any decoded image to an 8 bit grayscale quadtree image.
pub fn to_quadtree_image(image: DynamicImage) -> Result<qtree::Image> {
    let (width, height) = (image.width(), image.height());
    if width != height {
        bail!("Image is {width}×{height}, but must be square")
    }
    if !width.is_power_of_two() {
        bail!("Image side length {width} is not a power of two")
    }

    Ok(qtree::Image::from_raw(width as usize, image.into_luma8().into_raw())?)
}

/// Convert a quadtree image into an `image` grayscale buffer.
pub fn to_gray_image(image: &qtree::Image) -> Result<GrayImage> {
    let side = u32::try_from(image.side_length())?;

    match GrayImage::from_raw(side, side, image.as_raw().to_vec()) {
        Some(gray) => Ok(gray),
        None => bail!("Pixel buffer does not match a {side}×{side} image"),
    }
}

pub fn exists_decision<P: AsRef<Path>>(place: &str, action: &str, path: &P, assume: Option<Assume>) -> bool {
    let path = path.as_ref();

    match assume {
        Some(Assume::Yes) => return true,
        Some(Assume::No) => return false,
        None => (),
    }

    loop {
        print!("{place} file {path:?} already exists. {action}? [y/N] ");
        let _ = io::stdout().flush();

        let opt: String = read!("{}\n");
        match opt.trim().to_lowercase().as_str() {
            "y" | "yes" => return true,
            "" | "n" | "no" => return false,
            _ => continue,
        }
    }
}
