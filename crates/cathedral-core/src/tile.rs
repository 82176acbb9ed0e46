//! Tile categories and per-cell output records

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Structural tile category assigned by the classifier
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum TileCategory {
    #[serde(rename = "open")]
    #[strum(serialize = "open")]
    Open = 0,
    #[serde(rename = "solid")]
    #[strum(serialize = "solid")]
    Solid = 1,
    #[serde(rename = "wall_N")]
    #[strum(serialize = "wall_N")]
    WallN = 2,
    #[serde(rename = "wall_S")]
    #[strum(serialize = "wall_S")]
    WallS = 3,
    #[serde(rename = "wall_E")]
    #[strum(serialize = "wall_E")]
    WallE = 4,
    #[serde(rename = "wall_W")]
    #[strum(serialize = "wall_W")]
    WallW = 5,
    #[serde(rename = "corner_outer_NE")]
    #[strum(serialize = "corner_outer_NE")]
    CornerOuterNE = 6,
    #[serde(rename = "corner_outer_NW")]
    #[strum(serialize = "corner_outer_NW")]
    CornerOuterNW = 7,
    #[serde(rename = "corner_outer_SE")]
    #[strum(serialize = "corner_outer_SE")]
    CornerOuterSE = 8,
    #[serde(rename = "corner_outer_SW")]
    #[strum(serialize = "corner_outer_SW")]
    CornerOuterSW = 9,
    #[serde(rename = "corner_inner_NE")]
    #[strum(serialize = "corner_inner_NE")]
    CornerInnerNE = 10,
    #[serde(rename = "corner_inner_NW")]
    #[strum(serialize = "corner_inner_NW")]
    CornerInnerNW = 11,
    #[serde(rename = "corner_inner_SE")]
    #[strum(serialize = "corner_inner_SE")]
    CornerInnerSE = 12,
    #[serde(rename = "corner_inner_SW")]
    #[strum(serialize = "corner_inner_SW")]
    CornerInnerSW = 13,
    /// Diagonal floor with diagonal wall; no single tile is correct
    #[serde(rename = "ambiguous_saddle")]
    #[strum(serialize = "ambiguous_saddle")]
    AmbiguousSaddle = 14,
}

impl TileCategory {
    /// Check if this is one of the four straight walls
    pub const fn is_straight_wall(&self) -> bool {
        matches!(
            self,
            TileCategory::WallN | TileCategory::WallS | TileCategory::WallE | TileCategory::WallW
        )
    }

    /// Check if this is a convex room corner
    pub const fn is_outer_corner(&self) -> bool {
        matches!(
            self,
            TileCategory::CornerOuterNE
                | TileCategory::CornerOuterNW
                | TileCategory::CornerOuterSE
                | TileCategory::CornerOuterSW
        )
    }

    /// Check if this is a concave room corner
    pub const fn is_inner_corner(&self) -> bool {
        matches!(
            self,
            TileCategory::CornerInnerNE
                | TileCategory::CornerInnerNW
                | TileCategory::CornerInnerSE
                | TileCategory::CornerInnerSW
        )
    }

    /// Saddle tiles are left for the renderer to resolve
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, TileCategory::AmbiguousSaddle)
    }

    /// Stable name, also used as the tileset sprite name
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

bitflags! {
    /// Wall bits of a 2x2 neighborhood anchored at a cell.
    ///
    /// NW is the cell itself, NE its right neighbour, SW the cell below and SE
    /// the diagonal. A set bit means wall; outside the grid counts as wall.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NeighborhoodPattern: u8 {
        const SW = 0x01;
        const SE = 0x02;
        const NE = 0x04;
        const NW = 0x08;
    }
}

impl NeighborhoodPattern {
    /// Table index, always below 16
    pub const fn index(&self) -> usize {
        self.bits() as usize
    }

    /// Build from raw bits, rejecting anything outside the 4-bit range
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_bits(index)
    }
}

// Serialized as its 4-bit value
impl Serialize for NeighborhoodPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NeighborhoodPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        NeighborhoodPattern::from_bits(bits)
            .ok_or_else(|| serde::de::Error::custom(format!("pattern {bits} exceeds 4 bits")))
    }
}

/// Classification of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCell {
    /// True when the cell is floor
    pub occupied: bool,
    pub category: TileCategory,
    /// The neighborhood the category was looked up from
    pub pattern: NeighborhoodPattern,
    /// Floor created by corridor carving
    pub carved: bool,
    /// Wall grown by the divider pass
    #[serde(default)]
    pub divider: bool,
}
