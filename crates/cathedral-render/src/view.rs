//! What to draw at each cell
//!
//! A cell's category describes the 2x2 block it anchors, which is the corner
//! at its lower right, not the cell itself. Renderers draw floor as floor and
//! give wall cells the shape read from their own four corners.

use cathedral_core::generation::corner_shape;
use cathedral_core::{DungeonResult, TileCategory};

/// Drawable content of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    /// Walkable floor
    Floor { carved: bool },
    /// Wall with the shape of the room edge it lies on
    Wall { shape: TileCategory, divider: bool },
    /// Saddle left unresolved
    Ambiguous,
}

/// Views of every cell, row-major.
pub fn cell_views(result: &DungeonResult) -> Vec<CellView> {
    let grid = result.occupancy();
    result
        .cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let (x, y) = (i % result.width, i / result.width);
            if cell.category.is_ambiguous() {
                return CellView::Ambiguous;
            }
            if cell.occupied {
                return CellView::Floor {
                    carved: cell.carved,
                };
            }
            let shape = match corner_shape(&grid, x, y) {
                TileCategory::AmbiguousSaddle => return CellView::Ambiguous,
                // Floor at every corner: a one-cell-thick wall or a pillar
                TileCategory::Open => {
                    let (x, y) = (x as isize, y as isize);
                    if grid.is_floor_at(x - 1, y) && grid.is_floor_at(x + 1, y) {
                        TileCategory::WallW
                    } else if grid.is_floor_at(x, y - 1) && grid.is_floor_at(x, y + 1) {
                        TileCategory::WallN
                    } else {
                        TileCategory::Solid
                    }
                }
                shape => shape,
            };
            CellView::Wall {
                shape,
                divider: cell.divider,
            }
        })
        .collect()
}
