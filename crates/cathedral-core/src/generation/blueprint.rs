//! Random blueprint construction by recursive subdivision
//!
//! The blueprint region is split into quadrants (or halves) until blocks reach
//! the minimum size, or until a random draw stops the split early. Each leaf
//! then becomes floor or wall as a whole. Pending regions live on an explicit
//! work-list, so the visiting order, and with it the sequence of random draws,
//! is fixed: NW, NE, SW, SE (or low half, high half), depth first.

use log::debug;

use crate::config::{Axis, DungeonConfig, SplitStrategy};
use crate::grid::{OccupancyGrid, Region};
use crate::rng::DungeonRng;

/// Coarse floor/wall layout produced once per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Blueprint {
    grid: OccupancyGrid,
}

impl Blueprint {
    /// Wrap an existing coarse grid, e.g. a hand-drawn layout.
    pub fn from_grid(grid: OccupancyGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }
}

/// A pending region on the work-list.
#[derive(Debug, Clone, Copy)]
struct QuadrantNode {
    region: Region,
    depth: u32,
    /// Axis to split next under `SplitStrategy::Bisect`
    axis: Axis,
}

/// What happens to a popped region.
enum Decision {
    Leaf,
    Split(Vec<Region>, Axis),
}

/// Settings for a single blueprint, taken from a [`DungeonConfig`].
#[derive(Debug, Clone, Copy)]
pub struct BlueprintBuilder {
    width: usize,
    height: usize,
    min_block_size: usize,
    floor_probability: f64,
    subdivide_probability: f64,
    split: SplitStrategy,
}

impl BlueprintBuilder {
    pub fn new(config: &DungeonConfig) -> Self {
        Self {
            width: config.blueprint_width,
            height: config.blueprint_height,
            min_block_size: config.min_block_size.max(1),
            floor_probability: config.floor_probability,
            subdivide_probability: config.subdivide_probability,
            split: config.split,
        }
    }

    /// Build one blueprint, drawing all randomness from `rng`.
    pub fn build(&self, rng: &mut DungeonRng) -> Blueprint {
        let mut grid = OccupancyGrid::new(self.width, self.height);
        let first_axis = match self.split {
            SplitStrategy::Quadrants => Axis::X,
            SplitStrategy::Bisect { first } => first,
        };
        let mut pending = vec![QuadrantNode {
            region: Region::new(0, 0, self.width, self.height),
            depth: 0,
            axis: first_axis,
        }];
        let mut leaves = 0usize;

        while let Some(node) = pending.pop() {
            match self.decide(&node, rng) {
                Decision::Leaf => {
                    let floor = rng.chance(self.floor_probability);
                    grid.fill(&node.region, floor);
                    leaves += 1;
                }
                Decision::Split(children, used_axis) => {
                    // Reverse so the first child is popped first
                    for region in children.into_iter().rev() {
                        pending.push(QuadrantNode {
                            region,
                            depth: node.depth + 1,
                            axis: used_axis.other(),
                        });
                    }
                }
            }
        }

        debug!(
            "blueprint {}x{}: {} leaves, {} floor cells",
            self.width,
            self.height,
            leaves,
            grid.floor_count()
        );
        Blueprint { grid }
    }

    fn decide(&self, node: &QuadrantNode, rng: &mut DungeonRng) -> Decision {
        let region = node.region;
        let can_x = region.width > self.min_block_size;
        let can_y = region.height > self.min_block_size;
        if !can_x && !can_y {
            return Decision::Leaf;
        }
        // The root always splits so a level is never one solid block
        if node.depth > 0 && !rng.chance(self.subdivide_probability) {
            return Decision::Leaf;
        }

        match self.split {
            SplitStrategy::Quadrants => {
                let children = match (can_x, can_y) {
                    (true, true) => {
                        let (top, bottom) = region.split_y();
                        let (nw, ne) = top.split_x();
                        let (sw, se) = bottom.split_x();
                        vec![nw, ne, sw, se]
                    }
                    (true, false) => {
                        let (w, e) = region.split_x();
                        vec![w, e]
                    }
                    _ => {
                        let (n, s) = region.split_y();
                        vec![n, s]
                    }
                };
                Decision::Split(children, node.axis)
            }
            SplitStrategy::Bisect { .. } => {
                let axis = match node.axis {
                    Axis::X if can_x => Axis::X,
                    Axis::Y if can_y => Axis::Y,
                    other => other.other(),
                };
                let (a, b) = match axis {
                    Axis::X => region.split_x(),
                    Axis::Y => region.split_y(),
                };
                Decision::Split(vec![a, b], axis)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: usize, height: usize, min_block_size: usize) -> DungeonConfig {
        DungeonConfig {
            blueprint_width: width,
            blueprint_height: height,
            min_block_size,
            expansion: 1,
            floor_probability: 0.5,
            subdivide_probability: 1.0,
            split: SplitStrategy::Quadrants,
            min_floor_cells: 0,
            max_attempts: 1,
            divider_ratio: 0.0,
        }
    }

    #[test]
    fn test_dimensions_match_config() {
        let mut rng = DungeonRng::new(42);
        let bp = BlueprintBuilder::new(&config(13, 7, 2)).build(&mut rng);
        assert_eq!(bp.width(), 13);
        assert_eq!(bp.height(), 7);
    }

    #[test]
    fn test_floor_probability_one_gives_all_floor() {
        let mut rng = DungeonRng::new(1);
        let cfg = DungeonConfig {
            floor_probability: 1.0,
            ..config(4, 4, 1)
        };
        let bp = BlueprintBuilder::new(&cfg).build(&mut rng);
        assert_eq!(bp.grid().floor_count(), 16);
    }

    #[test]
    fn test_floor_probability_zero_gives_all_wall() {
        let mut rng = DungeonRng::new(1);
        let cfg = DungeonConfig {
            floor_probability: 0.0,
            ..config(9, 5, 1)
        };
        let bp = BlueprintBuilder::new(&cfg).build(&mut rng);
        assert_eq!(bp.grid().floor_count(), 0);
    }

    #[test]
    fn test_same_seed_same_blueprint() {
        let cfg = config(16, 16, 1);
        let a = BlueprintBuilder::new(&cfg).build(&mut DungeonRng::new(99));
        let b = BlueprintBuilder::new(&cfg).build(&mut DungeonRng::new(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_region_below_block_size_is_single_leaf() {
        // 3x3 with block size 3: the root is already a leaf, so the whole
        // blueprint is uniform
        let mut rng = DungeonRng::new(5);
        let bp = BlueprintBuilder::new(&config(3, 3, 3)).build(&mut rng);
        let count = bp.grid().floor_count();
        assert!(count == 0 || count == 9);
    }

    #[test]
    fn test_leaves_respect_block_size() {
        // With full subdivision and block size 2, every leaf of an 8x8 region
        // is exactly 2x2, so each aligned 2x2 block is uniform
        let mut rng = DungeonRng::new(3);
        let bp = BlueprintBuilder::new(&config(8, 8, 2)).build(&mut rng);
        let grid = bp.grid();
        for by in (0..8).step_by(2) {
            for bx in (0..8).step_by(2) {
                let v = grid.is_floor(bx, by);
                assert_eq!(grid.is_floor(bx + 1, by), v);
                assert_eq!(grid.is_floor(bx, by + 1), v);
                assert_eq!(grid.is_floor(bx + 1, by + 1), v);
            }
        }
    }

    #[test]
    fn test_bisect_strategy_terminates_on_odd_sizes() {
        let cfg = DungeonConfig {
            split: SplitStrategy::Bisect { first: Axis::Y },
            subdivide_probability: 0.6,
            ..config(11, 5, 1)
        };
        let bp = BlueprintBuilder::new(&cfg).build(&mut DungeonRng::new(8));
        assert_eq!((bp.width(), bp.height()), (11, 5));
    }

    #[test]
    fn test_no_subdivision_gives_quadrant_blocks() {
        // Subdivision chance zero: only the forced root split happens, so the
        // four quadrants of a 6x6 blueprint are each uniform
        let cfg = DungeonConfig {
            subdivide_probability: 0.0,
            ..config(6, 6, 1)
        };
        let bp = BlueprintBuilder::new(&cfg).build(&mut DungeonRng::new(21));
        let grid = bp.grid();
        for (qx, qy) in [(0, 0), (3, 0), (0, 3), (3, 3)] {
            let v = grid.is_floor(qx, qy);
            for y in qy..qy + 3 {
                for x in qx..qx + 3 {
                    assert_eq!(grid.is_floor(x, y), v);
                }
            }
        }
    }
}
