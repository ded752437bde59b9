use std::fmt::{self, Display};

use crate::coordinate::Coordinate;

/// One of the four equal sub-regions of a split region.
///
/// The discriminants give the order children are stored and serialized in.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperLeft = 0,
    UpperRight = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

impl Quadrant {
    /// Every quadrant, in serialization order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperLeft,
        Quadrant::UpperRight,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    /// The top-left corner of this quadrant, for a parent region starting at
    /// `start` whose quadrants have a side length of `half`.
    pub fn origin(self, start: Coordinate, half: usize) -> Coordinate {
        match self {
            Quadrant::UpperLeft => start,
            Quadrant::UpperRight => start.offset(0, half),
            Quadrant::LowerLeft => start.offset(half, 0),
            Quadrant::LowerRight => start.offset(half, half),
        }
    }
}

impl TryFrom<u8> for Quadrant {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::UpperLeft,
            1 => Self::UpperRight,
            2 => Self::LowerLeft,
            3 => Self::LowerRight,
            v => return Err(format!("invalid quadrant {v}")),
        })
    }
}

/// A node of the compression tree.
///
/// A [`QuadNode::Leaf`] covers a square region holding a single grayscale
/// value. A [`QuadNode::Split`] covers a region divided into four quadrants
/// of half the side length, stored in [`Quadrant::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuadNode {
    /// A uniform region.
    Leaf(u8),

    /// A region divided into four quadrants.
    Split(Box<[QuadNode; 4]>),
}

impl QuadNode {
    /// Build a split node from its four children.
    pub fn split(
        upper_left: QuadNode,
        upper_right: QuadNode,
        lower_left: QuadNode,
        lower_right: QuadNode,
    ) -> Self {
        Self::Split(Box::new([upper_left, upper_right, lower_left, lower_right]))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The grayscale value, if this is a leaf.
    pub fn value(&self) -> Option<u8> {
        match self {
            Self::Leaf(v) => Some(*v),
            Self::Split(_) => None,
        }
    }

    pub fn children(&self) -> Option<&[QuadNode; 4]> {
        match self {
            Self::Leaf(_) => None,
            Self::Split(children) => Some(children),
        }
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadNode> {
        self.children().map(|c| &c[quadrant as usize])
    }

    /// Total number of nodes in this subtree, leaves and splits alike.
    ///
    /// For a root this is the compressed size of the image.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Split(children) => 1 + children.iter().map(QuadNode::node_count).sum::<usize>(),
        }
    }

    /// Number of splits on the longest path from this node to a leaf.
    ///
    /// A tree describes an image of side length `n` only when its depth is
    /// at most `log2(n)`.
    pub fn depth(&self) -> u32 {
        match self {
            Self::Leaf(_) => 0,
            Self::Split(children) => {
                1 + children.iter().map(QuadNode::depth).max().unwrap_or(0)
            }
        }
    }
}

/// Space separated preorder listing, with `-1` marking a split.
impl Display for QuadNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(v) => write!(f, "{v}"),
            Self::Split(children) => {
                write!(f, "{}", crate::stream::QUAD_SPLIT)?;
                for child in children.iter() {
                    write!(f, " {child}")?;
                }
                Ok(())
            }
        }
    }
}
