use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use thiserror::Error;

use crate::{
    binio::{read_varint_records, write_varint_records, RecordReader, RecordWriter},
    compression::{decoder, encoder},
    header::Header,
    image::Image,
    node::QuadNode,
    stream::{flatten, parse_all, side_length_for},
};

/// A quadtree compressed grayscale image.
///
/// Holds the most recently compressed or uncompressed image together with
/// its compression tree. Every successful [`QuadPicture::compress`] or
/// [`QuadPicture::uncompress`] replaces both; a failed call leaves the
/// picture untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadPicture {
    image: Option<Image>,
    tree: Option<QuadNode>,

    raw_size: usize,
    compressed_size: usize,
}

impl QuadPicture {
    /// Create an empty picture holding no image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a picture by compressing an image.
    pub fn from_image(image: Image) -> Self {
        let mut picture = Self::new();
        picture.compress(image);
        picture
    }

    /// Compress an image, replacing the current contents.
    pub fn compress(&mut self, image: Image) {
        let compressed = encoder::compress(&image);

        self.raw_size = compressed.raw_size;
        self.compressed_size = compressed.compressed_size;
        self.tree = Some(compressed.tree);
        self.image = Some(image);
    }

    /// Compress raw pixel values listed row-major.
    pub fn compress_values(&mut self, values: &[i32]) -> Result<(), Error> {
        let image = Image::from_values(values)?;
        self.compress(image);

        Ok(())
    }

    /// Rebuild an image of `pixel_count` pixels from its preorder records.
    pub fn uncompress(&mut self, pixel_count: usize, records: &[i32]) -> Result<(), Error> {
        let side_length = side_length_for(pixel_count)?;
        let tree = parse_all(records)?;
        let image = decoder::uncompress(&tree, side_length)?;

        self.raw_size = image.raw_size();
        self.compressed_size = records.len();
        self.tree = Some(tree);
        self.image = Some(image);

        Ok(())
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn into_image(self) -> Option<Image> {
        self.image
    }

    pub fn tree(&self) -> Option<&QuadNode> {
        self.tree.as_ref()
    }

    /// Side length of the current image, or 0 when there is none.
    pub fn side_length(&self) -> usize {
        self.image.as_ref().map_or(0, Image::side_length)
    }

    /// Number of pixels in the current image.
    pub fn raw_size(&self) -> usize {
        self.raw_size
    }

    /// Number of nodes in the current tree.
    pub fn compressed_size(&self) -> usize {
        self.compressed_size
    }

    /// Compressed size as a percentage of the raw size.
    pub fn compression_ratio(&self) -> Option<f64> {
        if self.tree.is_none() || self.raw_size == 0 {
            return None;
        }

        Some(100.0 * self.compressed_size as f64 / self.raw_size as f64)
    }

    /// The tree flattened into preorder records.
    pub fn to_records(&self) -> Result<Vec<i32>, Error> {
        self.tree.as_ref().map(flatten).ok_or(Error::NotCompressedYet)
    }

    /// Write the compressed text form: the pixel count, then one preorder
    /// record per line.
    pub fn write_compressed<O: Write>(&self, mut output: O) -> Result<(), Error> {
        let records = self.to_records()?;

        let mut writer = RecordWriter::new(&mut output);
        writer.write_header(self.raw_size)?;
        writer.write_records(&records)?;
        writer.flush()?;

        Ok(())
    }

    /// Read the compressed text form written by [`QuadPicture::write_compressed`].
    pub fn read_compressed<I: BufRead>(input: I) -> Result<Self, Error> {
        let mut reader = RecordReader::new(input);
        let pixel_count = reader.read_header()?;
        let records = reader.read_to_end()?;

        let mut picture = Self::new();
        picture.uncompress(pixel_count, &records)?;

        Ok(picture)
    }

    /// Write the raw text form: the pixel count, then one pixel per line in
    /// row-major order.
    pub fn write_raw<O: Write>(&self, mut output: O) -> Result<(), Error> {
        let image = self.image.as_ref().ok_or(Error::NotCompressedYet)?;

        let mut writer = RecordWriter::new(&mut output);
        writer.write_header(image.raw_size())?;
        writer.write_records(&image.to_values())?;
        writer.flush()?;

        Ok(())
    }

    /// Read the raw text form and compress it.
    pub fn read_raw<I: BufRead>(input: I) -> Result<Self, Error> {
        let mut reader = RecordReader::new(input);
        let declared = reader.read_header()?;
        let values = reader.read_to_end()?;

        if values.len() != declared {
            return Err(Error::CountMismatch {
                declared,
                actual: values.len(),
            });
        }

        let mut picture = Self::new();
        picture.compress_values(&values)?;

        Ok(picture)
    }

    /// Encode the picture into the binary container, returning the number of
    /// bytes written.
    pub fn encode<O: Write>(&self, mut output: O) -> Result<usize, Error> {
        let records = self.to_records()?;

        let header = Header::new(self.side_length(), records.len())?;

        let mut size = header.write_into(&mut output)?;
        size += write_varint_records(&mut output, &records)?;
        output.flush()?;

        Ok(size)
    }

    /// Decode a picture from the binary container.
    pub fn decode<I: Read>(mut input: I) -> Result<Self, Error> {
        let header = Header::read_from(&mut input)?;
        let declared = header.node_count as usize;
        let records = read_varint_records(&mut input, declared)?;

        if records.len() != declared {
            return Err(Error::CountMismatch {
                declared,
                actual: records.len(),
            });
        }

        let side_length = header.side_length as usize;
        let pixel_count = side_length
            .checked_mul(side_length)
            .ok_or(Error::ImageTooLarge(side_length))?;

        let mut picture = Self::new();
        picture.uncompress(pixel_count, &records)?;

        Ok(picture)
    }

    /// Save the picture to a path, choosing the format from the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let container = Container::from_path(&path);
        let output = BufWriter::new(File::create(path)?);

        match container {
            Container::Raw => self.write_raw(output),
            Container::Compressed => self.write_compressed(output),
            Container::Binary => self.encode(output).map(|_| ()),
        }
    }
}

/// Open a picture from a path, choosing the format from the extension.
pub fn open<P: AsRef<Path>>(path: P) -> Result<QuadPicture, Error> {
    let container = Container::from_path(&path);
    let input = BufReader::new(File::open(path)?);

    match container {
        Container::Raw => QuadPicture::read_raw(input),
        Container::Compressed => QuadPicture::read_compressed(input),
        Container::Binary => QuadPicture::decode(input),
    }
}

/// The on-disk representations of a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Pixel count, then one pixel per line. Extensions `raw` and `txt`.
    Raw,

    /// Pixel count, then one preorder record per line. Any other extension,
    /// conventionally `rit`.
    Compressed,

    /// [`Header`] followed by varint records. Extension `qtb`.
    Binary,
}

impl Container {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("raw" | "txt") => Self::Raw,
            Some("qtb") => Self::Binary,
            _ => Self::Compressed,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("split marker with only {remaining} records after it, 4 subtrees needed")]
    MalformedStream { remaining: usize },

    #[error("no records to parse")]
    EmptyStream,

    #[error("pixel count {0} is not a perfect square")]
    NotPerfectSquare(usize),

    #[error("side length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    #[error("value {value} at position {index} is not a grayscale level (0-255)")]
    InvalidValue { value: i32, index: usize },

    #[error("line {line}: \"{content}\" is not an integer record")]
    InvalidRecord { line: usize, content: String },

    #[error("missing size header")]
    MissingHeader,

    #[error("header declares {declared} records, found {actual}")]
    CountMismatch { declared: usize, actual: usize },

    #[error("{0} records left over after the tree")]
    TrailingRecords(usize),

    #[error("tree of depth {depth} does not fit an image with side length {side_length}")]
    DepthMismatch { depth: u32, side_length: usize },

    #[error("tree is deeper than {0} levels")]
    DepthLimit(u32),

    #[error("image with side length {0} is too large for the binary format")]
    TooLarge(usize),

    #[error("tree of {0} nodes is too large for the binary format")]
    TooManyNodes(usize),

    #[error("image with side length {0} does not fit in memory")]
    ImageTooLarge(usize),

    #[error("incorrect identifier, got {0:02X?}")]
    InvalidIdentifier([u8; 8]),

    #[error("nothing has been compressed yet")]
    NotCompressedYet,

    #[error("io error")]
    Io(#[from] io::Error),
}
