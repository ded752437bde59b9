use byteorder::{ByteOrder, ReadBytesExt, LE};
use std::io::{Read, Write};

use crate::picture::Error;

/// Identifier at the start of every binary quadtree file.
pub const MAGIC: [u8; 8] = *b"qtreeimg";

/// A binary quadtree file header. This must be included at the beginning
/// of a valid binary file, and is followed by `node_count` varint records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Identifier. Must be set to "qtreeimg".
    pub magic: [u8; 8],

    /// Width and height of the image in pixels.
    pub side_length: u32,

    /// Number of records (tree nodes) following the header.
    pub node_count: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            side_length: 1,
            node_count: 1,
        }
    }
}

impl Header {
    pub const LEN: usize = 16;

    /// Header for an image of `side_length` described by `node_count`
    /// records, if both fit the container.
    pub fn new(side_length: usize, node_count: usize) -> Result<Self, Error> {
        Ok(Self {
            side_length: u32::try_from(side_length).map_err(|_| Error::TooLarge(side_length))?,
            node_count: u32::try_from(node_count).map_err(|_| Error::TooManyNodes(node_count))?,
            ..Default::default()
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];

        buf[..8].copy_from_slice(&self.magic);
        LE::write_u32(&mut buf[8..12], self.side_length);
        LE::write_u32(&mut buf[12..16], self.node_count);

        buf
    }

    pub fn write_into<T: Write>(&self, output: &mut T) -> Result<usize, std::io::Error> {
        output.write_all(&self.to_bytes())?;

        Ok(Self::LEN)
    }

    pub fn read_from<T: Read + ReadBytesExt>(input: &mut T) -> Result<Self, Error> {
        let mut magic = [0u8; 8];
        input.read_exact(&mut magic)?;

        if magic != MAGIC {
            return Err(Error::InvalidIdentifier(magic));
        }

        let header = Header {
            magic,
            side_length: input.read_u32::<LE>()?,
            node_count: input.read_u32::<LE>()?,
        };

        if !header.side_length.is_power_of_two() {
            return Err(Error::NotPowerOfTwo(header.side_length as usize));
        }

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let header = Header {
            side_length: 256,
            node_count: 0x0102_0304,
            ..Default::default()
        };

        let bytes = header.to_bytes();
        assert_eq!(&bytes[..8], b"qtreeimg");
        assert_eq!(&bytes[8..12], &[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(&bytes[12..], &[0x04, 0x03, 0x02, 0x01]);

        let read = Header::read_from(&mut &bytes[..]).unwrap();
        assert_eq!(read, header);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn sizes_must_fit() {
        let header = Header::new(1024, 5).unwrap();
        assert_eq!((header.side_length, header.node_count), (1024, 5));

        assert!(matches!(Header::new(1 << 32, 1), Err(Error::TooLarge(s)) if s == 1 << 32));
        assert!(matches!(
            Header::new(1024, 1 << 32),
            Err(Error::TooManyNodes(n)) if n == 1 << 32
        ));
    }

    #[test]
    fn rejects_bad_identifier() {
        let mut bytes = Header::default().to_bytes();
        bytes[0] = b'x';

        assert!(matches!(
            Header::read_from(&mut &bytes[..]),
            Err(Error::InvalidIdentifier(m)) if &m == b"xtreeimg"
        ));
    }

    #[test]
    fn rejects_bad_side_length() {
        let header = Header {
            side_length: 12,
            ..Default::default()
        };

        assert!(matches!(
            Header::read_from(&mut &header.to_bytes()[..]),
            Err(Error::NotPowerOfTwo(12))
        ));
    }

    #[test]
    fn truncated() {
        let bytes = Header::default().to_bytes();
        assert!(matches!(
            Header::read_from(&mut &bytes[..10]),
            Err(Error::Io(_))
        ));
    }
}
