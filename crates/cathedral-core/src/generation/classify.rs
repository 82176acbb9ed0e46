//! Autotiling: assign a tile category to every cell from its 2x2 neighborhood
//!
//! This is marching squares over the wall bits of a cell, its right and lower
//! neighbours and the lower-right diagonal. The mapping lives in one table;
//! the two saddle patterns map to `AmbiguousSaddle` and are never guessed.

use crate::error::{GenerationError, Stage};
use crate::grid::OccupancyGrid;
use crate::tile::{NeighborhoodPattern, TileCategory, TileCell};

use TileCategory::*;

/// Category per pattern, indexed by the 4-bit wall mask (NW=8, NE=4, SE=2, SW=1).
pub const TILE_TABLE: [TileCategory; 16] = [
    Open,            // 0:  no walls
    CornerInnerSW,   // 1:  SW
    CornerInnerSE,   // 2:  SE
    WallS,           // 3:  SW SE
    CornerInnerNE,   // 4:  NE
    AmbiguousSaddle, // 5:  NE SW
    WallE,           // 6:  NE SE
    CornerOuterSE,   // 7:  all but NW
    CornerInnerNW,   // 8:  NW
    WallW,           // 9:  NW SW
    AmbiguousSaddle, // 10: NW SE
    CornerOuterSW,   // 11: all but NE
    WallN,           // 12: NW NE
    CornerOuterNW,   // 13: all but SE
    CornerOuterNE,   // 14: all but SW
    Solid,           // 15: all walls
];

/// Wall mask of the 2x2 block whose top-left cell is (x, y).
pub fn neighborhood(grid: &OccupancyGrid, x: usize, y: usize) -> NeighborhoodPattern {
    let (x, y) = (x as isize, y as isize);
    let mut pattern = NeighborhoodPattern::empty();
    for (flag, dx, dy) in [
        (NeighborhoodPattern::NW, 0, 0),
        (NeighborhoodPattern::NE, 1, 0),
        (NeighborhoodPattern::SE, 1, 1),
        (NeighborhoodPattern::SW, 0, 1),
    ] {
        pattern.set(flag, !grid.is_floor_at(x + dx, y + dy));
    }
    pattern
}

/// Look a pattern up in [`TILE_TABLE`].
pub fn category_for(pattern: NeighborhoodPattern) -> Option<TileCategory> {
    TILE_TABLE.get(pattern.index()).copied()
}

/// True when all four cells of the 2x2 block whose top-left is (x, y) are wall.
fn solid_block(grid: &OccupancyGrid, x: isize, y: isize) -> bool {
    [(0, 0), (1, 0), (0, 1), (1, 1)]
        .iter()
        .all(|&(dx, dy)| !grid.is_floor_at(x + dx, y + dy))
}

/// Wall shape of cell (x, y), read from its four corners.
///
/// A corner is solid when every cell meeting there is wall, i.e. when the
/// 2x2 block ending at that corner classifies as `Solid`. The solid corners
/// form a mask looked up in the same [`TILE_TABLE`], so a wall cell along the
/// top of a room reads `WallN` and a concave room corner reads as an inner
/// corner. A wall cell touched by floor at every corner (a one-cell-thick
/// divider or pillar) reads `Open`; floor cells always do.
pub fn corner_shape(grid: &OccupancyGrid, x: usize, y: usize) -> TileCategory {
    let (x, y) = (x as isize, y as isize);
    let mut corners = NeighborhoodPattern::empty();
    corners.set(NeighborhoodPattern::NW, solid_block(grid, x - 1, y - 1));
    corners.set(NeighborhoodPattern::NE, solid_block(grid, x, y - 1));
    corners.set(NeighborhoodPattern::SE, solid_block(grid, x, y));
    corners.set(NeighborhoodPattern::SW, solid_block(grid, x - 1, y));
    TILE_TABLE[corners.index()]
}

/// Classify every cell of `grid`, row-major.
///
/// Reads the grid only. `carved` is the corridor mask from the connectivity
/// pass (all false if none ran).
pub fn classify(grid: &OccupancyGrid, carved: &[bool]) -> Result<Vec<TileCell>, GenerationError> {
    let width = grid.width();
    grid.iter()
        .map(|(x, y, occupied)| {
            let pattern = neighborhood(grid, x, y);
            let category = category_for(pattern).ok_or_else(|| {
                GenerationError::invariant(
                    Stage::Classification,
                    x,
                    y,
                    format!("pattern {} has no table entry", pattern.bits()),
                )
            })?;
            Ok(TileCell {
                occupied,
                category,
                pattern,
                carved: carved.get(y * width + x).copied().unwrap_or(false),
                divider: false,
            })
        })
        .collect()
}
