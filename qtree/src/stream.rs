//! The flat record form of a compression tree.
//!
//! A tree is written in preorder: a leaf is a single record holding its
//! grayscale value, and a split is the [`QUAD_SPLIT`] record followed by the
//! records of its upper-left, upper-right, lower-left and lower-right
//! children. The sentinel tells a reader that four subtrees follow, so the
//! body needs no length prefix.

use crate::{node::QuadNode, picture::Error};

/// Record value marking a split node.
pub const QUAD_SPLIT: i32 = -1;

/// The deepest tree that can be parsed.
///
/// The pixel count of an image must fit in a `usize`, so no valid image has
/// a side length above `2^(usize::BITS / 2)`.
pub const MAX_DEPTH: u32 = usize::BITS / 2;

/// Flatten a tree into its preorder records.
pub fn flatten(node: &QuadNode) -> Vec<i32> {
    let mut records = Vec::with_capacity(node.node_count());
    flatten_into(node, &mut records);
    records
}

/// Append the preorder records of a tree onto `records`.
pub fn flatten_into(node: &QuadNode, records: &mut Vec<i32>) {
    let mut stack = vec![node];

    while let Some(node) = stack.pop() {
        match node {
            QuadNode::Leaf(value) => records.push(i32::from(*value)),
            QuadNode::Split(children) => {
                records.push(QUAD_SPLIT);
                // Reversed so the upper-left child is visited next
                stack.extend(children.iter().rev());
            }
        }
    }
}

/// A read position over a borrowed slice of records.
#[derive(Debug, Clone)]
pub struct RecordCursor<'a> {
    records: &'a [i32],
    position: usize,
}

impl<'a> RecordCursor<'a> {
    pub fn new(records: &'a [i32]) -> Self {
        Self {
            records,
            position: 0,
        }
    }

    /// Index of the next record to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of records not yet read.
    pub fn remaining(&self) -> usize {
        self.records.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next record, advancing the cursor.
    pub fn next_record(&mut self) -> Option<i32> {
        let record = *self.records.get(self.position)?;
        self.position += 1;
        Some(record)
    }
}

/// Parse one tree from the front of the cursor.
///
/// Records after the tree are left unread.
pub fn parse(cursor: &mut RecordCursor) -> Result<QuadNode, Error> {
    if cursor.is_empty() {
        return Err(Error::EmptyStream);
    }

    parse_node(cursor, 0)
}

/// Parse a slice that must hold exactly one tree.
pub fn parse_all(records: &[i32]) -> Result<QuadNode, Error> {
    let mut cursor = RecordCursor::new(records);
    let tree = parse(&mut cursor)?;

    if !cursor.is_empty() {
        return Err(Error::TrailingRecords(cursor.remaining()));
    }

    Ok(tree)
}

fn parse_node(cursor: &mut RecordCursor, depth: u32) -> Result<QuadNode, Error> {
    let index = cursor.position();
    let value = cursor
        .next_record()
        .ok_or(Error::MalformedStream { remaining: 0 })?;

    if value != QUAD_SPLIT {
        return u8::try_from(value)
            .map(QuadNode::Leaf)
            .map_err(|_| Error::InvalidValue { value, index });
    }

    if cursor.remaining() < 4 {
        return Err(Error::MalformedStream {
            remaining: cursor.remaining(),
        });
    }

    if depth >= MAX_DEPTH {
        return Err(Error::DepthLimit(MAX_DEPTH));
    }

    let upper_left = parse_node(cursor, depth + 1)?;
    let upper_right = parse_node(cursor, depth + 1)?;
    let lower_left = parse_node(cursor, depth + 1)?;
    let lower_right = parse_node(cursor, depth + 1)?;

    Ok(QuadNode::split(upper_left, upper_right, lower_left, lower_right))
}

/// Derive the side length of an image from its declared pixel count.
pub fn side_length_for(pixel_count: usize) -> Result<usize, Error> {
    let side_length = pixel_count.isqrt();

    if side_length * side_length != pixel_count {
        return Err(Error::NotPerfectSquare(pixel_count));
    }

    if !side_length.is_power_of_two() {
        return Err(Error::NotPowerOfTwo(side_length));
    }

    Ok(side_length)
}

/// Check that a tree can be decoded into an image of `side_length`, which
/// must already be a power of two.
pub fn check_depth(tree: &QuadNode, side_length: usize) -> Result<(), Error> {
    let depth = tree.depth();

    if depth > side_length.trailing_zeros() {
        return Err(Error::DepthMismatch { depth, side_length });
    }

    Ok(())
}
