//! Blueprint to full-resolution expansion

use log::debug;

use crate::grid::{OccupancyGrid, Region};

use super::blueprint::Blueprint;

/// Expand every blueprint cell into a `factor` x `factor` block.
///
/// `factor` must be at least 1; configuration validation rejects 0 before
/// this runs.
pub fn expand(blueprint: &Blueprint, factor: usize) -> OccupancyGrid {
    assert!(factor >= 1, "expansion factor must be at least 1");
    let coarse = blueprint.grid();
    let mut grid = OccupancyGrid::new(coarse.width() * factor, coarse.height() * factor);

    for (x, y, floor) in coarse.iter() {
        if floor {
            grid.fill(&Region::new(x * factor, y * factor, factor, factor), true);
        }
    }

    debug!(
        "expanded {}x{} blueprint by {} to {}x{}",
        coarse.width(),
        coarse.height(),
        factor,
        grid.width(),
        grid.height()
    );
    grid
}
