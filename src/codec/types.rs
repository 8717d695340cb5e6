use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Map identifier, as numbered by the game's map constants
pub type MapId = u16;
/// Tile set identifier
pub type TilesetId = u8;
/// Index of a block within a tile set's blockset
pub type BlockIndex = u8;
/// Identifier of a canonical (deduplicated) tile image
pub type ImageId = u32;

/// Tiles along each side of a block
pub const BLOCK_SIZE: i32 = 2;

/// Side of a map a connection leaves from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::East, Self::West];

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            _ => Err(format!("invalid direction: {s:?}")),
        }
    }
}

/// Width and height of a map in tile units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Extent of a map measured in blocks
    pub fn from_blocks(width: u16, height: u16) -> Self {
        Self {
            width: width as i32 * BLOCK_SIZE,
            height: height as i32 * BLOCK_SIZE,
        }
    }
}

/// Translation applied to a map's local tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle of tiles, `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl TileRect {
    pub fn at(offset: Offset, extent: Extent) -> Self {
        Self {
            min_x: offset.x,
            min_y: offset.y,
            max_x: offset.x + extent.width,
            max_y: offset.y + extent.height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    pub fn intersects(&self, other: &TileRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    pub fn union(&self, other: &TileRect) -> TileRect {
        TileRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
