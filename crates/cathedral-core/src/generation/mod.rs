//! Dungeon generation pipeline
//!
//! Blueprint -> expansion -> connectivity -> (dividers) -> classification.
//! Each stage is a pure function of the previous stage's output; only the
//! blueprint and the optional divider pass draw randomness.

mod blueprint;
mod classify;
mod connectivity;
mod dividers;
mod expand;

pub use blueprint::{Blueprint, BlueprintBuilder};
pub use classify::{TILE_TABLE, category_for, classify, corner_shape, neighborhood};
pub use connectivity::{
    ConnectivityReport, ConnectivityTracker, Corridor, Resolved, RoomMap, count_rooms,
    label_rooms, resolve_connectivity,
};
pub use dividers::{DividerReport, Divided, add_dividers};
pub use expand::expand;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::error::GenerationError;
use crate::grid::OccupancyGrid;
use crate::rng::DungeonRng;
use crate::tile::{TileCategory, TileCell};

/// Finished layout handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonResult {
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` entries
    pub cells: Vec<TileCell>,
    pub connectivity: ConnectivityReport,
    #[serde(default)]
    pub dividers: DividerReport,
    pub seed: u64,
    /// Attempt that produced this layout, starting at 1
    pub attempt: u32,
    pub config: DungeonConfig,
}

impl DungeonResult {
    /// Cell at (x, y)
    pub fn cell(&self, x: usize, y: usize) -> &TileCell {
        &self.cells[y * self.width + x]
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[TileCell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Occupancy as a grid again, e.g. to re-run classification
    pub fn occupancy(&self) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(self.width, self.height);
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.occupied {
                grid.set(i % self.width, i / self.width, true);
            }
        }
        grid
    }

    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    pub fn wall_count(&self) -> usize {
        self.cells.len() - self.floor_count()
    }

    /// Number of cells with the given category
    pub fn count(&self, category: TileCategory) -> usize {
        self.cells.iter().filter(|c| c.category == category).count()
    }

    /// Coordinates of saddle cells the renderer has to handle
    pub fn ambiguous_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.category.is_ambiguous())
            .map(|(i, _)| (i % self.width, i / self.width))
    }
}

/// Generate a dungeon from `config` with a fresh RNG seeded by `seed`.
pub fn generate(config: &DungeonConfig, seed: u64) -> Result<DungeonResult, GenerationError> {
    generate_with_rng(config, &mut DungeonRng::new(seed))
}

/// Generate a dungeon, drawing from `rng`.
///
/// Attempts whose expanded grid has fewer than `min_floor_cells` floor cells
/// are discarded, as are attempts whose dividing walls cut the floor apart.
/// The next attempt continues the same random stream.
pub fn generate_with_rng(
    config: &DungeonConfig,
    rng: &mut DungeonRng,
) -> Result<DungeonResult, GenerationError> {
    config.validate()?;
    let builder = BlueprintBuilder::new(config);
    let mut best = 0;
    let mut unpathable = 0;

    for attempt in 1..=config.max_attempts {
        let blueprint = builder.build(rng);
        let grid = expand(&blueprint, config.expansion);
        let floor = grid.floor_count();
        if floor < config.min_floor_cells {
            debug!(
                "attempt {}: {} floor cells, {} required",
                attempt, floor, config.min_floor_cells
            );
            best = best.max(floor);
            continue;
        }
        match finish(config, rng, attempt, &grid)? {
            Some(result) => {
                if attempt > 1 {
                    warn!("discarded {} attempts", attempt - 1);
                }
                return Ok(result);
            }
            None => {
                debug!("attempt {}: dividers split the floor", attempt);
                unpathable += 1;
            }
        }
    }

    if unpathable > 0 {
        return Err(GenerationError::Unpathable {
            attempts: unpathable,
        });
    }
    Err(GenerationError::InsufficientFloor {
        best,
        required: config.min_floor_cells,
        attempts: config.max_attempts,
    })
}

/// Connectivity, dividers and classification for an expanded grid.
///
/// `None` when the dividers left more than one room.
fn finish(
    config: &DungeonConfig,
    rng: &mut DungeonRng,
    attempt: u32,
    grid: &OccupancyGrid,
) -> Result<Option<DungeonResult>, GenerationError> {
    let Resolved {
        grid,
        carved,
        mut report,
    } = resolve_connectivity(grid)?;

    let Divided {
        grid,
        divider,
        report: divider_report,
    } = if config.divider_ratio > 0.0 {
        add_dividers(&grid, config.divider_ratio, rng)
    } else {
        Divided {
            divider: vec![false; carved.len()],
            grid,
            report: DividerReport::default(),
        }
    };
    if divider_report.walls > 0 {
        let rooms = count_rooms(&grid);
        if rooms > 1 {
            return Ok(None);
        }
        report.rooms_after = rooms;
    }

    let mut cells = classify(&grid, &carved)?;
    for (cell, &wall) in cells.iter_mut().zip(&divider) {
        cell.divider = wall;
        cell.carved &= cell.occupied;
    }

    let result = DungeonResult {
        width: grid.width(),
        height: grid.height(),
        cells,
        connectivity: report,
        dividers: divider_report,
        seed: rng.seed(),
        attempt,
        config: config.clone(),
    };
    info!(
        "generated {}x{} dungeon (seed {}, attempt {}): {} rooms joined by {} corridors, {} divider cells, {} doorways, {} ambiguous tiles",
        result.width,
        result.height,
        result.seed,
        attempt,
        result.connectivity.rooms_before,
        result.connectivity.corridors.len(),
        result.dividers.walls,
        result.dividers.doors,
        result.count(TileCategory::AmbiguousSaddle)
    );
    Ok(Some(result))
}
